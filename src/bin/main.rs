// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

use clap::Parser;
use csv::{ReaderBuilder, Trim, Writer};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;
use std::process;
use stock_ledger_rs::{InventoryDirectory, ItemDraft, ItemId, StockStatus};

/// Stock Ledger - Process inventory movement CSV files
///
/// Reads stock movements from a CSV file and outputs the resulting
/// inventory report to stdout. Items not seen before are registered on
/// first mention with default thresholds.
#[derive(Parser, Debug)]
#[command(name = "stock-ledger-rs")]
#[command(about = "An inventory engine that processes stock movement CSVs", long_about = None)]
struct Args {
    /// Path to CSV file with stock movements
    ///
    /// Expected format: code,name,category,quantity,operation,reason,actor
    /// Example: cargo run -- movements.csv > inventory.csv
    #[arg(value_name = "FILE")]
    input: PathBuf,
}

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Open input file
    let file = match File::open(&args.input) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error opening file '{}': {}", args.input.display(), e);
            process::exit(1);
        }
    };

    // Process movements from CSV
    let directory = match process_movements(BufReader::new(file)) {
        Ok(directory) => directory,
        Err(e) => {
            eprintln!("Error processing movements: {}", e);
            process::exit(1);
        }
    };

    // Write results to stdout
    if let Err(e) = write_report(&directory, std::io::stdout()) {
        eprintln!("Error writing output: {}", e);
        process::exit(1);
    }
}

/// Raw CSV record matching the input format.
///
/// Fields: `code, name, category, quantity, operation, reason, actor`
#[derive(Debug, Deserialize)]
struct CsvRecord {
    code: String,
    name: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    category: Option<String>,
    quantity: u32,
    operation: String,
    reason: String,
    actor: String,
}

impl CsvRecord {
    /// The signed delta implied by the operation column.
    ///
    /// Returns `None` for operations other than `add`/`subtract`.
    fn delta(&self) -> Option<i64> {
        match self.operation.to_lowercase().as_str() {
            "add" => Some(i64::from(self.quantity)),
            "subtract" => Some(-i64::from(self.quantity)),
            _ => None,
        }
    }
}

/// Process stock movements from a CSV reader.
///
/// Streaming parse, so arbitrarily large movement files never have to fit
/// in memory. Malformed rows and rejected adjustments are skipped without
/// stopping the run. The first row mentioning a code registers the item
/// with default thresholds; later rows only adjust its stock.
///
/// # CSV Format
///
/// Expected columns: `code, name, category, quantity, operation, reason, actor`
/// - `code`: Item code, unique per item within the file
/// - `name`: Display name, used when the code is first seen
/// - `category`: Optional category, defaults to "Other"
/// - `quantity`: Magnitude of the movement (u32)
/// - `operation`: `add` or `subtract`
/// - `reason`: Justification, required
/// - `actor`: Operator identity, required
///
/// # Example
///
/// ```csv
/// code,name,category,quantity,operation,reason,actor
/// GL-01,Surgical Gloves,Consumable,100,add,initial delivery,storekeeper
/// GL-01,Surgical Gloves,Consumable,30,subtract,ward request,nurse1
/// ```
///
/// # Errors
///
/// Returns a CSV error if the reader fails or the CSV structure is invalid.
/// Individual rejections are logged in debug mode but don't stop processing.
pub fn process_movements<R: Read>(reader: R) -> Result<InventoryDirectory, csv::Error> {
    let directory = InventoryDirectory::new();
    let mut ids_by_code: HashMap<String, ItemId> = HashMap::new();

    let mut rdr = ReaderBuilder::new()
        .trim(Trim::All) // Handle whitespace in fields like " add "
        .flexible(true) // Allow short rows; they fail deserialization below
        .has_headers(true)
        .from_reader(reader);

    for result in rdr.deserialize::<CsvRecord>() {
        match result {
            Ok(record) => {
                let Some(delta) = record.delta() else {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping unknown operation '{}'", record.operation);
                    continue;
                };

                let id = match ids_by_code.get(&record.code) {
                    Some(id) => *id,
                    None => {
                        let draft = ItemDraft {
                            code: Some(record.code.clone()),
                            name: record.name.clone(),
                            category: record
                                .category
                                .clone()
                                .unwrap_or_else(|| "Other".to_string()),
                            ..ItemDraft::default()
                        };
                        match directory.create(draft) {
                            Ok(snapshot) => {
                                ids_by_code.insert(record.code.clone(), snapshot.id);
                                snapshot.id
                            }
                            Err(e) => {
                                #[cfg(debug_assertions)]
                                eprintln!("Skipping item '{}': {}", record.code, e);
                                continue;
                            }
                        }
                    }
                };

                // Apply the movement, ignoring rejections (silent failure)
                if let Err(e) = directory.adjust_stock(id, delta, &record.reason, &record.actor) {
                    #[cfg(debug_assertions)]
                    eprintln!("Skipping movement for '{}': {}", record.code, e);
                }
            }
            Err(e) => {
                // Skip malformed rows
                #[cfg(debug_assertions)]
                eprintln!("Skipping malformed row: {}", e);
                continue;
            }
        }
    }

    Ok(directory)
}

/// Flat report row; the nested snapshot doesn't fit CSV.
#[derive(Debug, Serialize)]
struct ReportRecord {
    code: String,
    name: String,
    category: String,
    quantity: u32,
    minimum_stock: u32,
    status: StockStatus,
    stock_value: Decimal,
}

/// Write the inventory report to a CSV writer.
///
/// One row per item in registration order.
///
/// # CSV Format
///
/// Columns: `code, name, category, quantity, minimum_stock, status, stock_value`
///
/// # Example
///
/// ```csv
/// code,name,category,quantity,minimum_stock,status,stock_value
/// GL-01,Surgical Gloves,Consumable,70,10,In Stock,35.00
/// ```
///
/// # Errors
///
/// Returns a CSV error if writing fails.
pub fn write_report<W: Write>(
    directory: &InventoryDirectory,
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_writer(writer);

    for item in directory.snapshots() {
        wtr.serialize(ReportRecord {
            code: item.code.clone(),
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            minimum_stock: item.minimum_stock,
            status: item.status,
            stock_value: item.stock_value(),
        })?;
    }

    // Flush to ensure all data is written
    wtr.flush()?;
    Ok(())
}
