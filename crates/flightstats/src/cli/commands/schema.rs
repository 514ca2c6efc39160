use anyhow::Result;

use crate::models::{ResponseEnvelope, output_schemas};

pub fn run() -> Result<()> {
    super::emit(&ResponseEnvelope::ok("schema", output_schemas()))
}
