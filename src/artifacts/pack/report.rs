//! Hash-ordered verification report
//!
//! One line per distinct object, in ascending hash order, so the report
//! for an unchanged pack is byte-identical across runs:
//!
//! - non-delta: `<hash> <kind> <actual> <stored> <offset>`
//! - delta: the same, then `<chain length> <parent hash>`
//!
//! The kind column is padded to six characters, the widest kind name.
//! Parents referenced by offset are resolved through the offset index;
//! a miss there is fatal, never a silently skipped line.

use crate::artifacts::pack::entry::BasePointer;
use crate::artifacts::pack::error::PackError;
use crate::artifacts::pack::verify::PackIndex;
use std::collections::BTreeMap;
use std::io::Write;

/// Emit one report line per object, in ascending hash order
pub fn write_report(index: &PackIndex, writer: &mut dyn Write) -> anyhow::Result<()> {
    for oid in index.oids() {
        let record = index
            .record(oid)
            .ok_or_else(|| PackError::MissingIndex(oid.clone()))?;

        match &record.delta {
            None => writeln!(
                writer,
                "{} {:<6} {} {} {}",
                oid,
                record.kind.as_str(),
                record.actual_size,
                record.stored_size,
                record.offset
            )?,
            Some((pointer, chain_length)) => {
                let parent = match pointer {
                    BasePointer::Hash(parent) => parent.clone(),
                    BasePointer::Offset(rel) => {
                        let parent_offset = record.offset - rel;
                        index
                            .oid_at_offset(parent_offset)
                            .ok_or(PackError::MissingBaseOffset(parent_offset))?
                            .clone()
                    }
                };
                writeln!(
                    writer,
                    "{} {:<6} {} {} {} {} {}",
                    oid,
                    record.kind.as_str(),
                    record.actual_size,
                    record.stored_size,
                    record.offset,
                    chain_length,
                    parent
                )?;
            }
        }
    }

    Ok(())
}

/// Print the delta chain length distribution after the listing
pub fn write_stats(index: &PackIndex, writer: &mut dyn Write) -> anyhow::Result<()> {
    let mut histogram: BTreeMap<u32, u64> = BTreeMap::new();
    for oid in index.oids() {
        let record = index
            .record(oid)
            .ok_or_else(|| PackError::MissingIndex(oid.clone()))?;
        let depth = record.delta.as_ref().map_or(0, |(_, chain_length)| *chain_length);
        *histogram.entry(depth).or_insert(0) += 1;
    }

    writeln!(writer, "non delta: {} objects", histogram.remove(&0).unwrap_or(0))?;
    for (depth, count) in histogram {
        writeln!(writer, "chain length = {depth}: {count} objects")?;
    }

    Ok(())
}
