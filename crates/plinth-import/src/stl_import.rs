//! STL importer (ASCII and binary)

use crate::format::SourceFormat;
use crate::types::{ImportedModel, MeshPart};
use plinth_core::{PlinthError, Result};

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Decode an STL payload. Binary is detected by its exact record length;
/// anything else starting with `solid` is read as ASCII.
pub fn import_stl(bytes: &[u8]) -> Result<ImportedModel> {
    let (name, positions) = if is_binary(bytes) {
        ("stl".to_string(), parse_binary(bytes)?)
    } else if bytes.trim_ascii_start().starts_with(b"solid") {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| PlinthError::Import(format!("STL is not valid UTF-8: {}", e)))?;
        parse_ascii(text)?
    } else {
        return Err(PlinthError::Import(
            "STL is neither ASCII nor a well-formed binary file".to_string(),
        ));
    };

    let indices = (0..positions.len() as u32).collect();
    Ok(ImportedModel {
        format: SourceFormat::Stl,
        parts: vec![MeshPart::new(name, positions, indices)],
        materials_bound: false,
        source_hash: None,
    })
}

fn is_binary(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LEN + 4 {
        return false;
    }
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    count
        .checked_mul(RECORD_LEN)
        .and_then(|n| n.checked_add(HEADER_LEN + 4))
        .is_some_and(|expected| expected == bytes.len())
}

fn parse_binary(bytes: &[u8]) -> Result<Vec<[f32; 3]>> {
    let body = &bytes[HEADER_LEN + 4..];
    let mut positions = Vec::with_capacity(body.len() / RECORD_LEN * 3);
    for record in body.chunks_exact(RECORD_LEN) {
        // 12 bytes of facet normal, then three vertices, then 2 attribute bytes
        for v in 0..3 {
            let base = 12 + v * 12;
            let f = |o: usize| {
                let b = &record[base + o..base + o + 4];
                f32::from_le_bytes([b[0], b[1], b[2], b[3]])
            };
            positions.push([f(0), f(4), f(8)]);
        }
    }
    Ok(positions)
}

fn parse_ascii(text: &str) -> Result<(String, Vec<[f32; 3]>)> {
    let mut name = String::from("stl");
    let mut positions = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("solid") => {
                if let Some(n) = tokens.next() {
                    name = n.to_string();
                }
            }
            Some("vertex") => {
                let mut coords = [0.0f32; 3];
                for c in coords.iter_mut() {
                    let token = tokens.next().ok_or_else(|| {
                        PlinthError::Import(format!("STL line {}: vertex needs 3 values", line_no + 1))
                    })?;
                    *c = token.parse().map_err(|_| {
                        PlinthError::Import(format!(
                            "STL line {}: bad coordinate '{}'",
                            line_no + 1,
                            token
                        ))
                    })?;
                }
                positions.push(coords);
            }
            _ => {}
        }
    }

    // A dangling partial facet is dropped
    positions.truncate(positions.len() / 3 * 3);
    Ok((name, positions))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASCII_TRI: &str = "solid wedge
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid wedge
";

    fn binary_tri() -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN];
        bytes.extend_from_slice(&1u32.to_le_bytes());
        for v in [0.0f32, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0, 0.0] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        bytes.extend_from_slice(&[0, 0]);
        bytes
    }

    #[test]
    fn test_ascii_triangle() {
        let model = import_stl(ASCII_TRI.as_bytes()).unwrap();
        assert_eq!(model.parts[0].name, "wedge");
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.parts[0].positions[1], [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_binary_triangle() {
        let model = import_stl(&binary_tri()).unwrap();
        assert_eq!(model.triangle_count(), 1);
        assert_eq!(model.parts[0].positions[2], [0.0, 2.0, 0.0]);
    }

    #[test]
    fn test_binary_header_starting_with_solid() {
        let mut bytes = binary_tri();
        bytes[..5].copy_from_slice(b"solid");
        assert_eq!(import_stl(&bytes).unwrap().triangle_count(), 1);
    }

    #[test]
    fn test_bad_coordinate_is_import_error() {
        let text = ASCII_TRI.replace("vertex 1 0 0", "vertex 1 zero 0");
        let err = import_stl(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("bad coordinate"));
    }

    #[test]
    fn test_rejects_unknown_payload() {
        assert!(import_stl(b"PK\x03\x04 not an stl").is_err());
    }
}
