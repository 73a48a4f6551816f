//! protoc-gen-errors
//!
//! Usage:
//!   protoc --errors_out=./gen proto/*.proto

use std::io::{self, Read, Write};

use prost::Message;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    protoc_gen_errors::logging::init();

    // Read the CodeGeneratorRequest from stdin
    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let response = protoc_gen_errors::generate_from_bytes(&input);

    // Write the response to stdout
    let mut output = Vec::new();
    response.encode(&mut output)?;
    io::stdout().write_all(&output)?;

    Ok(())
}
