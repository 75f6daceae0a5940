//! Schema command - print expected input formats

use clap::Args;
use schemars::schema_for;
use zavetax::core::LedgerInput;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or csv-header
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the ledger file
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::CsvHeader => self.print_csv_header(),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(LedgerInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_csv_header(&self) -> anyhow::Result<()> {
        let header: Vec<_> = CSV_FIELDS.iter().map(|(name, _, _)| *name).collect();
        println!("{}", header.join(","));
        Ok(())
    }

    fn print_csv_fields(&self) -> anyhow::Result<()> {
        println!("CSV Input Format");
        println!("================");
        println!();
        for (name, required, description) in CSV_FIELDS {
            let req = if *required { "required" } else { "optional" };
            println!("{:18} ({:8})  {}", name, req, description);
        }
        println!();
        println!("Budgets and deductions can only be supplied in the JSON ledger");
        Ok(())
    }
}

const CSV_FIELDS: &[(&str, bool, &str)] = &[
    ("id", true, "Unique transaction identifier"),
    ("occurred_on", true, "Transaction date (YYYY-MM-DD)"),
    ("kind", true, "income or expense"),
    ("amount", true, "Face value in THB; invalid or negative values count as 0"),
    ("category", false, "Category name, matched against budgets"),
    (
        "tax_mode",
        false,
        "Income only: vat_inclusive, vat_exclusive or no_vat",
    ),
    (
        "has_tax_invoice",
        false,
        "Expense only: true if a tax invoice was received",
    ),
    (
        "withholding_rate",
        false,
        "Expense only: withholding percentage (0, 1, 2, 3 or 5)",
    ),
    ("note", false, "Optional description"),
];
