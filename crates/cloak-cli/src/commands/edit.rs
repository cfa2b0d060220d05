//! The `edit` command: apply scripted edits to a file through the
//! in-memory editable stream and write the result next to the input.

use std::fs;

use anyhow::{bail, Context};

use cloak_core::stream::buffer::BufferStream;
use cloak_core::stream::{EditableStream, Stream};

use crate::pathutil;

/// One scripted operation against the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    Seek(i64),
    Insert(Vec<u8>),
    Delete(i64),
    Replace { count: i64, bytes: Vec<u8> },
    Read(usize),
}

/// Parse `spec` in the `--op` syntax: `seek:<pos>`, `insert:<hex>`,
/// `delete:<n>`, `replace:<n>:<hex>`, `read:<n>`.
pub fn parse_op(spec: &str) -> anyhow::Result<EditOp> {
    let (verb, rest) = spec
        .split_once(':')
        .with_context(|| format!("operation has no argument: {spec}"))?;
    match verb {
        "seek" => Ok(EditOp::Seek(rest.parse()?)),
        "insert" => Ok(EditOp::Insert(
            hex::decode(rest).with_context(|| format!("bad hex in insert: {rest}"))?,
        )),
        "delete" => Ok(EditOp::Delete(rest.parse()?)),
        "replace" => {
            let (count, hex_bytes) = rest
                .split_once(':')
                .with_context(|| format!("replace needs <n>:<hex>: {spec}"))?;
            Ok(EditOp::Replace {
                count: count.parse()?,
                bytes: hex::decode(hex_bytes)
                    .with_context(|| format!("bad hex in replace: {hex_bytes}"))?,
            })
        }
        "read" => Ok(EditOp::Read(rest.parse()?)),
        other => bail!("unknown operation: {other}"),
    }
}

/// Run `ops` against `stream`, printing what each one did.
pub fn apply(stream: &mut BufferStream, ops: &[EditOp]) -> anyhow::Result<()> {
    for op in ops {
        match op {
            EditOp::Seek(position) => {
                stream.seek(*position)?;
                println!("seek -> position {}", stream.position());
            }
            EditOp::Insert(bytes) => {
                let n = stream.insert(bytes);
                println!("insert -> {n} bytes, position {}", stream.position());
            }
            EditOp::Delete(count) => {
                let n = stream.delete(*count);
                println!("delete -> {n} bytes, position {}", stream.position());
            }
            EditOp::Replace { count, bytes } => {
                let n = stream.update(bytes, *count);
                println!(
                    "replace -> {n} bytes in place of {count}, position {}",
                    stream.position()
                );
            }
            EditOp::Read(count) => {
                let mut buf = vec![0u8; *count];
                let n = stream.read(&mut buf) as usize;
                println!("read -> {}", hex::encode(&buf[..n]));
            }
        }
    }
    Ok(())
}

pub fn run(file: &str, op_specs: &[String], dry_run: bool) -> anyhow::Result<()> {
    let ops = op_specs
        .iter()
        .map(|s| parse_op(s))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let bytes = fs::read(file).with_context(|| format!("failed to read {file}"))?;
    tracing::debug!(file, size = bytes.len(), "loaded file into buffer stream");

    let mut stream = BufferStream::new(bytes);
    apply(&mut stream, &ops)?;
    println!("final size {}", stream.size());

    if dry_run {
        println!("{}", hex::encode(stream.as_bytes()));
        return Ok(());
    }

    let output = pathutil::output_path(file);
    fs::write(&output, stream.into_inner())
        .with_context(|| format!("failed to write {output}"))?;
    println!("New file created: {output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_verb() {
        assert_eq!(parse_op("seek:4").unwrap(), EditOp::Seek(4));
        assert_eq!(parse_op("insert:aabb").unwrap(), EditOp::Insert(vec![0xAA, 0xBB]));
        assert_eq!(parse_op("delete:2").unwrap(), EditOp::Delete(2));
        assert_eq!(
            parse_op("replace:2:ff").unwrap(),
            EditOp::Replace {
                count: 2,
                bytes: vec![0xFF]
            }
        );
        assert_eq!(parse_op("read:8").unwrap(), EditOp::Read(8));
    }

    #[test]
    fn rejects_malformed_specs() {
        assert!(parse_op("seek").is_err());
        assert!(parse_op("insert:zz").is_err());
        assert!(parse_op("replace:2").is_err());
        assert!(parse_op("explode:1").is_err());
    }

    #[test]
    fn script_edits_buffer() {
        let mut stream = BufferStream::new(vec![0x01, 0x02, 0x03, 0x04, 0x05]);
        let ops = [
            parse_op("seek:4").unwrap(),
            parse_op("insert:aabb").unwrap(),
            parse_op("seek:0").unwrap(),
            parse_op("replace:2:ff").unwrap(),
        ];
        apply(&mut stream, &ops).unwrap();
        assert_eq!(stream.as_bytes(), &[0xFF, 0x03, 0x04, 0xAA, 0xBB, 0x05]);
    }

    #[test]
    fn out_of_range_seek_surfaces_as_error() {
        let mut stream = BufferStream::new(vec![1, 2, 3]);
        let err = apply(&mut stream, &[EditOp::Seek(9)]).unwrap_err();
        assert!(err.to_string().contains("larger than size"));
    }
}
