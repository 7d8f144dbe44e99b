//! protoc-gen-fieldmap
//!
//! A protoc plugin that emits Go field-mapping statements between protobuf
//! messages.
//!
//! Usage:
//!   protoc --fieldmap_out=from=api.GetUser,to=client.GetUserRequest:./gen proto/*.proto
//!   protoc --fieldmap_out=mode=propagate,to=client.GetUserRequest,map=Token=x-token:./gen proto/*.proto

#![deny(missing_docs)]

use std::io::{self, Read, Write};

use prost::Message;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod descriptor;
mod error;
mod params;
mod plugin;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // stdout carries the response, so logs go to stderr
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("FIELDMAP_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut input = Vec::new();
    io::stdin().read_to_end(&mut input)?;

    let response = plugin::generate_from_bytes(&input)?;

    let mut output = Vec::new();
    response.encode(&mut output)?;
    io::stdout().write_all(&output)?;

    Ok(())
}
