//! Writes the REST surface's OpenAPI document to disk.
//!
//! Usage: `openapi [OUTPUT]`, defaulting to `openapi.json`.

use turing_api::router::ApiDoc;
use utoipa::OpenApi;

fn write_document(api_doc: utoipa::openapi::OpenApi, path: &str) -> anyhow::Result<()> {
    let json = api_doc.to_pretty_json()?;
    std::fs::write(path, json)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "openapi.json".to_string());
    write_document(ApiDoc::openapi(), &path)?;
    println!("Wrote {path}");
    Ok(())
}
