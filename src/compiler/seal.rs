//! AST serialization and sealing
//!
//! A seal binds one AST to one IR text:
//!
//! ```text
//! seal = SHA-256( u64_le(len(ast)) || ast || ir )
//! ```
//!
//! The length prefix pins the boundary between the two inputs, so moving
//! bytes from the AST into the IR changes the digest. The seal is an integrity
//! checksum only; anyone holding the inputs can recompute it.

use crate::parser::Node;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Envelope tag of the sealing serialization
pub const AST_FORMAT: &str = "lettera-ast";
/// Envelope version of the sealing serialization
pub const AST_VERSION: u32 = 1;

#[derive(Serialize)]
struct AstEnvelope<'a> {
    format: &'static str,
    version: u32,
    root: &'a Node,
}

impl<'a> AstEnvelope<'a> {
    fn new(root: &'a Node) -> Self {
        Self {
            format: AST_FORMAT,
            version: AST_VERSION,
            root,
        }
    }
}

/// Canonical byte form of an AST, as fed to [`seal`]
pub fn serialize_ast(root: &Node) -> Vec<u8> {
    serde_json::to_vec(&AstEnvelope::new(root))
        .expect("AST holds only strings, sequences and enums; JSON encoding cannot fail")
}

/// Human-readable JSON form of an AST (same envelope, pretty-printed)
pub fn ast_to_json_pretty(root: &Node) -> String {
    serde_json::to_string_pretty(&AstEnvelope::new(root))
        .expect("AST holds only strings, sequences and enums; JSON encoding cannot fail")
}

/// 256-bit compilation seal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seal(pub [u8; 32]);

impl Seal {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Seal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Seal {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.trim(), &mut bytes)?;
        Ok(Seal(bytes))
    }
}

/// Seal a serialized AST together with its IR. Pure and total.
pub fn seal(ast: &[u8], ir: &[u8]) -> Seal {
    let mut hasher = Sha256::new();
    hasher.update((ast.len() as u64).to_le_bytes());
    hasher.update(ast);
    hasher.update(ir);
    Seal(hasher.finalize().into())
}

/// Recompute and compare
pub fn verify(expected: &Seal, ast: &[u8], ir: &[u8]) -> bool {
    seal(ast, ir) == *expected
}

/// [`verify`] against a hex seal; malformed hex never verifies
pub fn verify_hex(expected: &str, ast: &[u8], ir: &[u8]) -> bool {
    match expected.parse::<Seal>() {
        Ok(expected) => verify(&expected, ast, ir),
        Err(e) => {
            tracing::debug!("rejecting malformed seal: {}", e);
            false
        }
    }
}
