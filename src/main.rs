use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use thesaur_core::{
    AlphabeticalRequest, Config, IndexLetter, SearchSpec, VocabularyQueries,
};
use thesaur_endpoint::HttpEndpoint;

#[derive(Parser)]
#[command(name = "thesaur", about = "Query SKOS vocabularies held in a SPARQL store")]
struct Cli {
    /// Configuration file (default: ~/.config/thesaur/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write debug logs, including every query text, to thesaur-debug.log
    /// in the temp directory.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

/// Vocabulary and label language shared by most commands.
#[derive(Args)]
struct Target {
    /// Vocabulary id from the configuration.
    #[arg(long)]
    vocab: String,
    #[arg(long, default_value = "en")]
    lang: String,
}

#[derive(Subcommand)]
enum Command {
    /// Search concepts by label; `*` is a wildcard.
    Search {
        term: String,
        /// Vocabulary id; all configured vocabularies when omitted.
        #[arg(long)]
        vocab: Option<String>,
        #[arg(long, default_value = "en")]
        lang: String,
        /// Only match labels in this language.
        #[arg(long)]
        search_lang: Option<String>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        /// Restrict to a class; repeatable.
        #[arg(long = "type")]
        types: Vec<String>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        group: Option<String>,
        /// Restrict to a concept scheme; repeatable.
        #[arg(long = "scheme")]
        schemes: Vec<String>,
        /// Do not match hidden labels.
        #[arg(long)]
        no_hidden: bool,
        /// Include deprecated concepts.
        #[arg(long)]
        deprecated: bool,
        /// One hit per concept.
        #[arg(long)]
        unique: bool,
        /// Extra field to bundle into hits, e.g. `broader`; repeatable.
        #[arg(long = "field")]
        fields: Vec<String>,
    },
    /// One page of the alphabetical index (`*`, `0-9`, `!*` or a letter).
    Alpha {
        letter: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        offset: Option<usize>,
        #[arg(long)]
        deprecated: bool,
    },
    /// First characters of preferred labels, for index navigation.
    Letters {
        #[command(flatten)]
        target: Target,
    },
    /// Labels of a resource, by language.
    Label {
        uri: String,
        #[command(flatten)]
        target: Target,
        /// Preferred, alternate and hidden labels in one language.
        #[arg(long)]
        all: bool,
    },
    /// Objects of one property of a concept.
    Props {
        uri: String,
        property: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        any_lang: bool,
    },
    /// Transitive closure along hierarchy properties.
    Transitive {
        uri: String,
        #[command(flatten)]
        target: Target,
        /// Property to follow; repeatable. Defaults to the vocabulary's
        /// hierarchy properties.
        #[arg(long = "prop")]
        props: Vec<String>,
        #[arg(long, default_value_t = 1000)]
        limit: usize,
        #[arg(long)]
        any_lang: bool,
    },
    /// Immediate children of a concept.
    Children {
        uri: String,
        #[command(flatten)]
        target: Target,
    },
    /// Top concepts of concept schemes.
    Top {
        #[arg(required = true)]
        schemes: Vec<String>,
        #[command(flatten)]
        target: Target,
    },
    /// Ancestor tree of a concept.
    Hierarchy {
        uri: String,
        #[command(flatten)]
        target: Target,
    },
    /// Concept groups of a vocabulary.
    Groups {
        #[command(flatten)]
        target: Target,
    },
    /// Members of one group.
    Group {
        uri: String,
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        deprecated: bool,
    },
    /// Concept counts per type and label counts per language.
    Stats {
        #[command(flatten)]
        target: Target,
        /// Languages to count labels in; repeatable.
        #[arg(long = "count-lang")]
        langs: Vec<String>,
    },
    /// Full description of one or more concepts.
    Info {
        #[arg(required = true)]
        uris: Vec<String>,
        #[arg(long)]
        vocab: String,
        /// Print the raw graph instead of concept records.
        #[arg(long)]
        raw: bool,
    },
    /// Concept and collection classes in use.
    Types {
        #[command(flatten)]
        target: Target,
    },
    /// Concept schemes, or the statements of one scheme.
    Schemes {
        #[command(flatten)]
        target: Target,
        #[arg(long)]
        scheme: Option<String>,
    },
    /// Recently created or modified concepts.
    Changes {
        #[command(flatten)]
        target: Target,
        #[arg(long, default_value = "dc:created")]
        prop: String,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    if debug {
        let path = std::env::temp_dir().join("thesaur-debug.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)?;
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("thesaur debug log started, tail -f {}", path.display());
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }
    Ok(())
}

fn open(cfg: &Config, vocab: &str) -> anyhow::Result<VocabularyQueries<HttpEndpoint>> {
    let vocab_cfg = cfg
        .vocabulary(vocab)
        .with_context(|| format!("no vocabulary {vocab:?} in configuration"))?;
    let url = vocab_cfg.endpoint.as_deref().unwrap_or(&cfg.endpoint.url);
    let endpoint = HttpEndpoint::new(url, cfg.timeout())?;
    VocabularyQueries::from_config(cfg, vocab, endpoint)
}

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug)?;
    let cfg = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            term,
            vocab,
            lang,
            search_lang,
            limit,
            offset,
            types,
            parent,
            group,
            schemes,
            no_hidden,
            deprecated,
            unique,
            fields,
        } => {
            let queries = match vocab.as_deref() {
                Some(id) => open(&cfg, id)?,
                None => VocabularyQueries::federated(
                    &cfg,
                    HttpEndpoint::new(&cfg.endpoint.url, cfg.timeout())?,
                )?,
            };
            let spec = SearchSpec {
                search_lang,
                limit: limit.or(Some(cfg.search.default_limit)),
                offset,
                types,
                parent,
                group,
                schemes,
                include_hidden: !no_hidden,
                include_deprecated: deprecated,
                unique,
                extra_fields: fields,
                ..SearchSpec::new(term, lang)
            };
            print(&queries.search(&spec).await?)
        }
        Command::Alpha {
            letter,
            target,
            limit,
            offset,
            deprecated,
        } => {
            let queries = open(&cfg, &target.vocab)?;
            let mut req = AlphabeticalRequest::new(IndexLetter::parse(&letter), target.lang);
            req.limit = limit;
            req.offset = offset;
            req.include_deprecated = deprecated;
            print(&queries.alphabetical(&req).await?)
        }
        Command::Letters { target } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.first_characters(&target.lang, &[]).await?)
        }
        Command::Label { uri, target, all } => {
            let queries = open(&cfg, &target.vocab)?;
            if all {
                print(&queries.all_labels(&uri, &target.lang).await?)
            } else {
                print(&queries.label(&uri, &target.lang).await?)
            }
        }
        Command::Props {
            uri,
            property,
            target,
            any_lang,
        } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.property(&uri, &property, &target.lang, any_lang).await?)
        }
        Command::Transitive {
            uri,
            target,
            props,
            limit,
            any_lang,
        } => {
            let queries = open(&cfg, &target.vocab)?;
            print(
                &queries
                    .transitive(&uri, &props, &target.lang, limit, any_lang)
                    .await?,
            )
        }
        Command::Children { uri, target } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.children(&uri, &target.lang).await?)
        }
        Command::Top { schemes, target } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.top_concepts(&schemes, &target.lang).await?)
        }
        Command::Hierarchy { uri, target } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.parent_list(&uri, &target.lang).await?)
        }
        Command::Groups { target } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.groups(&target.lang).await?)
        }
        Command::Group {
            uri,
            target,
            deprecated,
        } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.group_contents(&uri, &target.lang, deprecated).await?)
        }
        Command::Stats { target, langs } => {
            let queries = open(&cfg, &target.vocab)?;
            let langs = if langs.is_empty() {
                cfg.vocabulary(&target.vocab)
                    .map(|v| v.languages.clone())
                    .unwrap_or_default()
            } else {
                langs
            };
            print(&serde_json::json!({
                "concepts": queries.count_concepts(&target.lang).await?,
                "labels": queries.count_lang_concepts(&langs, &[]).await?,
            }))
        }
        Command::Info { uris, vocab, raw } => {
            let queries = open(&cfg, &vocab)?;
            if raw {
                print(&queries.concept_info_graph(&uris).await?)
            } else {
                print(&queries.concept_info(&uris).await?)
            }
        }
        Command::Types { target } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.types(&target.lang).await?)
        }
        Command::Schemes { target, scheme } => {
            let queries = open(&cfg, &target.vocab)?;
            match scheme {
                Some(uri) => print(&queries.concept_scheme(&uri).await?),
                None => print(&queries.concept_schemes(&target.lang).await?),
            }
        }
        Command::Changes {
            target,
            prop,
            offset,
        } => {
            let queries = open(&cfg, &target.vocab)?;
            print(&queries.change_list(&target.lang, offset, &prop).await?)
        }
    }
}
