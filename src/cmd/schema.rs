//! Schema command - print the expected claim input format

use crate::claim::{ClaimInput, FormField};
use crate::tax::IncomeSources;
use clap::Args;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the claim input
    JsonSchema,
    /// Claim field descriptions
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => {
                self.print_fields();
                Ok(())
            }
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(ClaimInput);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) {
        println!("Claim Input Format");
        println!("==================");
        println!();
        print_field_list(ClaimInput::form_fields());
        println!();
        println!("Income components (under \"income\")");
        println!("-----------------------------------");
        println!();
        print_field_list(IncomeSources::form_fields());
        println!();
        println!("Amounts may include \u{00A3}, commas and spaces, e.g. \"\u{00A3}55,000\"");
    }
}

fn print_field_list(fields: &[FormField]) {
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        println!("{:32} ({:8})  {}", field.name, req, field.description);
    }
}
