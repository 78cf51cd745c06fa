use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::{value_parser, Arg, Command};
use tracing_subscriber::EnvFilter;

use knn_corpus::CorpusSpec;
use knn_features::FeaturesPayload;
use knn_service::{load_corpus_files, KnnConfig, KnnService, VERSION};
use knn_store::FeatureStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Command::new("knn-service")
        .version(VERSION)
        .about("KNN handwritten digit recognition")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("inspect")
                .about("Summarize a corpus directory")
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory holding the corpus blobs"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to a TOML config file"),
                ),
        )
        .subcommand(
            Command::new("classify")
                .about("Classify a query against a corpus")
                .arg(
                    Arg::new("data-dir")
                        .long("data-dir")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory holding the corpus blobs"),
                )
                .arg(
                    Arg::new("query")
                        .long("query")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("File of raw query feature bytes"),
                )
                .arg(
                    Arg::new("k")
                        .long("k")
                        .help("Neighbor count (defaults to the configured value)"),
                )
                .arg(
                    Arg::new("limit")
                        .long("limit")
                        .value_parser(value_parser!(usize))
                        .help("Seed at most this many training samples"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to a TOML config file"),
                ),
        );

    let matches = cli.get_matches();

    match matches.subcommand() {
        Some(("inspect", args)) => {
            let data_dir = args.get_one::<PathBuf>("data-dir").unwrap();
            let config = load_config(args.get_one::<PathBuf>("config")).await?;

            let samples = load_corpus_files(data_dir, &config.corpus, &CorpusSpec::mnist()).await?;

            println!("Records: {}", samples.len());
            println!(
                "Dimensions: {}",
                samples.first().map_or(0, |s| s.features.len())
            );

            let mut histogram: BTreeMap<String, usize> = BTreeMap::new();
            for sample in &samples {
                let label = sample.label.clone().unwrap_or_default();
                *histogram.entry(label).or_insert(0) += 1;
            }
            println!("Labels:");
            for (label, count) in &histogram {
                println!("  {}: {}", label, count);
            }
        }
        Some(("classify", args)) => {
            let data_dir = args.get_one::<PathBuf>("data-dir").unwrap();
            let query_path = args.get_one::<PathBuf>("query").unwrap();
            let k = args.get_one::<String>("k").cloned();
            let limit = args.get_one::<usize>("limit").copied();
            let config = load_config(args.get_one::<PathBuf>("config")).await?;

            let mut samples =
                load_corpus_files(data_dir, &config.corpus, &CorpusSpec::mnist()).await?;
            if let Some(limit) = limit {
                samples.truncate(limit);
            }

            let service = KnnService::new(FeatureStore::in_memory(), config);
            let seeded = service.seed_training(samples).await?;
            println!("Seeded {} training samples", seeded);

            let query = tokio::fs::read(query_path)
                .await
                .with_context(|| format!("reading query file {}", query_path.display()))?;
            let response = service
                .classify_request(FeaturesPayload::Raw(query), k.as_deref())
                .await?;

            println!("{}", serde_json::to_string_pretty(&response)?);
            service.close().await?;
        }
        _ => {}
    }

    Ok(())
}

async fn load_config(path: Option<&PathBuf>) -> anyhow::Result<KnnConfig> {
    Ok(match path {
        Some(path) => KnnConfig::load(path).await?,
        None => KnnConfig::new(),
    })
}
