use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use codeseek::index::{write_snapshot, DiskIndex, Index};
use codeseek::query::{
    AndPattern, CollectingRequestor, FieldPattern, MatchMode, MatchRule, MethodPattern, OrPattern,
    PathScope, PatternRef, PatternSearchJob, QueryContext, ReferencePattern, SearchParticipant,
    SearchQuery, SearchScope, TypeDeclarationPattern, WorkspaceScope,
};
use codeseek::IndexManifest;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "codeseek")]
#[command(about = "Boolean search over source-code declaration indexes", long_about = None)]
struct Args {
    /// Index files: JSON manifests or snapshots written with --write-snapshot
    #[arg(long = "index", env = "CODESEEK_INDEX", value_delimiter = ',', required = true)]
    indexes: Vec<PathBuf>,

    /// Type declaration, as NAME or NAME@NAMESPACE
    #[arg(long = "type")]
    types: Vec<String>,

    /// Method declaration, as SELECTOR or SELECTOR/ARITY
    #[arg(long = "method")]
    methods: Vec<String>,

    /// Field declaration name
    #[arg(long = "field")]
    fields: Vec<String>,

    /// Referenced name
    #[arg(long = "reference")]
    references: Vec<String>,

    /// Match mode
    #[arg(long, env = "CODESEEK_MODE", value_enum, default_value_t = ModeArg::Exact)]
    mode: ModeArg,

    /// Compare names ignoring ASCII case
    #[arg(long)]
    ignore_case: bool,

    /// Match documents satisfying any pattern instead of all of them
    #[arg(long)]
    any: bool,

    /// Only report documents under these paths
    #[arg(long = "scope")]
    scopes: Vec<String>,

    /// Write the (single, JSON) index as a snapshot file
    #[arg(long)]
    write_snapshot: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    Exact,
    Prefix,
    #[value(alias = "wildcard")]
    Pattern,
    #[value(name = "camelcase", alias = "camel-case")]
    CamelCase,
}

impl From<ModeArg> for MatchMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Exact => MatchMode::Exact,
            ModeArg::Prefix => MatchMode::Prefix,
            ModeArg::Pattern => MatchMode::Pattern,
            ModeArg::CamelCase => MatchMode::CamelCase,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("codeseek v{}", codeseek::VERSION);

    if let Some(target) = &args.write_snapshot {
        let [source] = args.indexes.as_slice() else {
            bail!("--write-snapshot needs exactly one --index");
        };
        let manifest = IndexManifest::load(source)
            .with_context(|| format!("loading manifest {}", source.display()))?;
        write_snapshot(&manifest.build_index(), target)
            .with_context(|| format!("writing snapshot {}", target.display()))?;
        info!("Snapshot written to {}", target.display());
    }

    let rule = MatchRule::new(args.mode.into(), !args.ignore_case);
    let patterns = build_patterns(&args, rule)?;
    if patterns.is_empty() {
        if args.write_snapshot.is_none() {
            bail!("nothing to search: pass --type, --method, --field or --reference");
        }
        return Ok(());
    }

    let query: SearchQuery = if patterns.len() == 1 {
        patterns[0].clone().into()
    } else if args.any {
        OrPattern::new(patterns.into_iter().map(SearchQuery::from).collect()).into()
    } else {
        AndPattern::try_from_patterns(patterns)?.into()
    };

    let indexes = args
        .indexes
        .iter()
        .map(|path| open_index(path))
        .collect::<Result<Vec<_>>>()?;

    let scope: Box<dyn SearchScope> = if args.scopes.is_empty() {
        Box::new(WorkspaceScope)
    } else {
        Box::new(PathScope::new(args.scopes.clone(), scope_separator(&indexes)?))
    };

    let participant = SearchParticipant::new("codeseek");
    let mut requestor = CollectingRequestor::new();
    let stats = {
        let mut ctx = QueryContext::new(&mut requestor, &participant, scope.as_ref());
        PatternSearchJob::new(query).run(&indexes, &mut ctx)?
    };

    for path in requestor.paths() {
        println!("{}", path);
    }
    info!(
        index_queries = stats.index_queries,
        entries_rejected = stats.entries_rejected,
        short_circuited = stats.short_circuited,
        "{} matching documents",
        requestor.paths().len()
    );

    Ok(())
}

fn build_patterns(args: &Args, rule: MatchRule) -> Result<Vec<PatternRef>> {
    let mut patterns: Vec<PatternRef> = Vec::new();

    for arg in &args.types {
        let (name, namespace) = match arg.split_once('@') {
            Some((name, namespace)) => (name, Some(namespace)),
            None => (arg.as_str(), None),
        };
        patterns.push(Arc::new(TypeDeclarationPattern::new(Some(name), namespace, rule)?));
    }

    for arg in &args.methods {
        let (selector, arity) = match arg.rsplit_once('/') {
            Some((selector, arity)) => {
                let arity = arity
                    .parse::<u32>()
                    .with_context(|| format!("invalid arity in --method {}", arg))?;
                (selector, Some(arity))
            }
            None => (arg.as_str(), None),
        };
        patterns.push(Arc::new(MethodPattern::new(Some(selector), arity, rule)?));
    }

    for name in &args.fields {
        patterns.push(Arc::new(FieldPattern::new(Some(name), rule)?));
    }

    for name in &args.references {
        patterns.push(Arc::new(ReferencePattern::new(Some(name), rule)?));
    }

    Ok(patterns)
}

/// Separator shared by every index; scope roots are split on it
fn scope_separator(indexes: &[Arc<dyn Index>]) -> Result<char> {
    let mut separators = indexes.iter().map(|index| index.separator());
    let Some(first) = separators.next() else {
        return Ok('/');
    };
    if let Some(other) = separators.find(|&sep| sep != first) {
        bail!(
            "--scope needs indexes with one path separator, found '{}' and '{}'",
            first,
            other
        );
    }
    Ok(first)
}

fn open_index(path: &Path) -> Result<Arc<dyn Index>> {
    let is_manifest = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));

    if is_manifest {
        let manifest = IndexManifest::load(path)
            .with_context(|| format!("loading manifest {}", path.display()))?;
        Ok(Arc::new(manifest.build_index()))
    } else {
        let index = DiskIndex::open(path)
            .with_context(|| format!("opening snapshot {}", path.display()))?;
        Ok(Arc::new(index))
    }
}
