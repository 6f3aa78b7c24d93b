use atx_rules::AccessRuleStore;
use rayon::prelude::*;

use crate::error::Result;
use crate::rewriter::BytecodeRewriter;

/// One named entry of an archive, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Path inside the archive, e.g. `net/minecraft/World.class`.
    pub name: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Class entries are rewritten; everything else passes through.
    pub fn is_class(&self) -> bool {
        self.name.ends_with(".class")
    }
}

/// Runs every entry of an archive through a [`BytecodeRewriter`].
///
/// Entries are independent and processed in parallel. The pass is
/// all-or-nothing: if any class entry fails to decode, no entries are
/// returned.
#[derive(Debug, Clone, Copy)]
pub struct ArchiveTransformDriver<'s> {
    rewriter: BytecodeRewriter<'s>,
    threads: Option<usize>,
}

impl<'s> ArchiveTransformDriver<'s> {
    pub fn new(store: &'s AccessRuleStore) -> Self {
        Self {
            rewriter: BytecodeRewriter::new(store),
            threads: None,
        }
    }

    /// Use a dedicated pool of `threads` workers instead of the global one.
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    /// Transform all entries, preserving their order.
    pub fn run(&self, entries: Vec<ArchiveEntry>) -> Result<Vec<ArchiveEntry>> {
        let total = entries.len();
        let work = || {
            entries
                .into_par_iter()
                .map(|entry| self.transform_entry(entry))
                .collect::<Result<Vec<_>>>()
        };

        let out = match self.threads {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(work)?,
            None => work()?,
        };

        let classes = out.iter().filter(|e| e.is_class()).count();
        log::info!(
            "Transformed {classes} class entries ({} other entries passed through)",
            total - classes
        );
        Ok(out)
    }

    fn transform_entry(&self, entry: ArchiveEntry) -> Result<ArchiveEntry> {
        if !entry.is_class() {
            return Ok(entry);
        }
        let data = self.rewriter.rewrite(&entry.name, &entry.data)?;
        Ok(ArchiveEntry {
            name: entry.name,
            data,
        })
    }
}
