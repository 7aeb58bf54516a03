use crate::areas::pack_store::PackStore;
use crate::areas::repository::Repository;
use crate::artifacts::pack::report::{write_report, write_stats};
use crate::artifacts::pack::verify;
use anyhow::Context;

impl Repository {
    /// Verify one pack and list its contents in ascending hash order
    ///
    /// The scan runs to completion before the first line is written, so a
    /// corrupt pack produces an error and no partial report. Progress goes
    /// to stderr and never mixes into the report.
    pub fn verify_pack(&self, name: &str, stats: bool) -> anyhow::Result<()> {
        let pack_path = self.find_pack(name)?;
        let store = PackStore::open(&pack_path)?;

        store.pack().verify_checksum().context(format!(
            "Pack {} failed checksum verification",
            pack_path.display()
        ))?;

        let index = verify::verify_pack(&store, |remaining| {
            eprintln!("Remaining objects: {remaining}");
        })
        .context(format!("Pack {} failed verification", pack_path.display()))?;

        write_report(&index, &mut *self.writer())?;
        if stats {
            write_stats(&index, &mut *self.writer())?;
        }

        Ok(())
    }
}
