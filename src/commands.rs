//! CLI commands: region, context, hash, match. A debugging surface over the
//! library; it enumerates no targets and invokes no analysis rules.

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use findbase::{
    EngineConfig, Error, ExtractedFinding, FileDataCache, OsFileSystem, Region, RegionResolver,
    Run, SnippetBuilder, matcher,
};

/// Region fields accepted on the command line.
#[derive(Debug, Clone, Copy, Default, clap::Args)]
pub struct RegionArgs {
    /// 1-based start line.
    #[arg(long)]
    pub start_line: Option<u32>,
    /// 1-based start column.
    #[arg(long)]
    pub start_column: Option<u32>,
    /// 1-based end line.
    #[arg(long)]
    pub end_line: Option<u32>,
    /// 1-based exclusive end column.
    #[arg(long)]
    pub end_column: Option<u32>,
    /// 0-based character offset.
    #[arg(long)]
    pub char_offset: Option<usize>,
    /// Length in characters.
    #[arg(long)]
    pub char_length: Option<usize>,
}

impl RegionArgs {
    fn to_region(self) -> Region {
        return Region {
            char_length: self.char_length,
            char_offset: self.char_offset,
            end_column: self.end_column,
            end_line: self.end_line,
            start_column: self.start_column,
            start_line: self.start_line,
            ..Region::default()
        };
    }
}

/// Shared setup: engine config plus a file cache over the real filesystem.
fn engine() -> Result<(EngineConfig, FileDataCache), Error> {
    let config = EngineConfig::load(Path::new("."))?;
    let cache = FileDataCache::with_capacity(Arc::new(OsFileSystem), config.cache_capacity);
    return Ok((config, cache));
}

fn cached_text_and_index(
    cache: &FileDataCache,
    file: &Path,
) -> Result<(Arc<str>, Arc<findbase::LineIndex>), Error> {
    let Some(text) = cache.text(file) else {
        return Err(Error::FileNotFound { path: file.to_path_buf() });
    };
    let Some(index) = cache.line_index(file) else {
        return Err(Error::FileNotFound { path: file.to_path_buf() });
    };
    return Ok((text, index));
}

/// Populate every text-addressing field of a region and print it as JSON.
///
/// # Errors
///
/// Returns errors from file access, resolution, or serialization.
pub fn region(file: &Path, args: RegionArgs) -> Result<(), Error> {
    let (config, cache) = engine()?;
    let (text, index) = cached_text_and_index(&cache, file)?;

    let resolver = RegionResolver::new(config.strictness);
    let populated = resolver.populate(&args.to_region(), &index, &text, true)?;
    println!("{}", serde_json::to_string_pretty(&populated)?);
    return Ok(());
}

/// Print the expanded context snippet around a region.
///
/// # Errors
///
/// Returns errors from file access or resolution.
pub fn context(file: &Path, args: RegionArgs) -> Result<(), Error> {
    let (config, cache) = engine()?;
    let (text, index) = cached_text_and_index(&cache, file)?;

    let builder = SnippetBuilder::new(RegionResolver::new(config.strictness));
    match builder.context_snippet(&args.to_region(), &text, &index)? {
        None => eprintln!("binary region: no textual context"),
        Some(snippet) => println!("{}", serde_json::to_string_pretty(&snippet)?),
    }
    return Ok(());
}

/// Print content digests for a file.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the file is missing or unreadable.
pub fn hash(file: &Path) -> Result<(), Error> {
    let (_config, cache) = engine()?;
    let Some(hash) = cache.hash(file) else {
        return Err(Error::FileNotFound { path: file.to_path_buf() });
    };
    for (algorithm, digest) in &hash.digests {
        println!("{algorithm}  {digest}");
    }
    return Ok(());
}

/// Pairwise-compare findings from two JSON logs. Greedy in log order: each
/// left finding claims the first unclaimed right finding it matches.
///
/// # Errors
///
/// Returns errors from log reading or decoding.
pub fn match_logs(left_path: &Path, right_path: &Path) -> Result<ExitCode, Error> {
    let config = EngineConfig::load(Path::new("."))?;
    let trust = config.trust_map();

    let left = Run::read(left_path)?;
    let right = Run::read(right_path)?;

    let mut claimed = vec![false; right.findings.len()];
    let mut matched_count = 0_usize;

    for finding in &left.findings {
        let left_view = ExtractedFinding::new(&left, finding);
        let claim = right.findings.iter().enumerate().find(|(idx, candidate)| {
            return !claimed[*idx]
                && matcher::matches(
                    Some(&left_view),
                    Some(&ExtractedFinding::new(&right, candidate)),
                    &trust,
                );
        });

        match claim {
            Some((idx, candidate)) => {
                claimed[idx] = true;
                matched_count = matched_count.saturating_add(1);
                println!("MATCHED  {}  {}", finding.rule_id, candidate.rule_id);
            },
            None => println!("ABSENT   {}", finding.rule_id),
        }
    }

    for (idx, candidate) in right.findings.iter().enumerate() {
        if !claimed[idx] {
            println!("NEW      {}", candidate.rule_id);
        }
    }

    let absent = left.findings.len().saturating_sub(matched_count);
    let new = right.findings.len().saturating_sub(matched_count);
    println!();
    println!("{matched_count} matched, {absent} absent, {new} new");

    if absent > 0 || new > 0 {
        return Ok(ExitCode::from(1));
    }
    return Ok(ExitCode::SUCCESS);
}
