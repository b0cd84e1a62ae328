//! design-eval CLI - score a graphic design with a vision LLM
//!
//! Main entry point for the design-eval command-line tool.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use design_eval::{
    load_config, AppConfig, DesignImage, DesignPrinciple, EvaluateOptions, EvaluatorConfig,
    GraphicDesignEvaluator, PromptStore, ProviderConfig, ProviderKind,
};
use std::path::PathBuf;
use tracing::Level;

#[derive(Parser)]
#[command(name = "design-eval")]
#[command(about = "Score graphic designs for alignment, overlap and whitespace", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Log request details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score one image
    Evaluate {
        /// Image file (PNG, JPEG, ...)
        image: PathBuf,

        #[command(flatten)]
        prompt: PromptArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Number of independent evaluations to request
        #[arg(short = 'n', long, default_value_t = 1)]
        samples: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask which of two images better follows a principle
    Compare {
        /// First image, labelled (a)
        image_a: PathBuf,
        /// Second image, labelled (b)
        image_b: PathBuf,

        #[command(flatten)]
        prompt: PromptArgs,

        #[command(flatten)]
        provider: ProviderArgs,

        /// Number of independent comparisons to request
        #[arg(short = 'n', long, default_value_t = 1)]
        samples: usize,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in principle instructions
    Principles,
}

#[derive(Args)]
struct PromptArgs {
    /// Built-in principle: alignment, overlap, whitespace
    #[arg(short, long)]
    principle: Option<String>,

    /// Custom evaluative instruction (overrides --principle)
    #[arg(long)]
    prompt: Option<String>,

    /// File containing a system prompt template with {design_principle}
    #[arg(long)]
    template: Option<PathBuf>,
}

#[derive(Args)]
struct ProviderArgs {
    /// TOML config file with [provider] and [evaluator] sections
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Provider when no config file is given: openai, anthropic, ollama
    #[arg(long, default_value = "openai")]
    provider: String,

    /// Model name when no config file is given
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Override the provider endpoint
    #[arg(long)]
    base_url: Option<String>,
}

impl PromptArgs {
    fn options(&self) -> anyhow::Result<EvaluateOptions> {
        // A custom prompt replaces the principle, so its name is not checked.
        let mut options = match (&self.prompt, &self.principle) {
            (Some(prompt), _) => EvaluateOptions::custom_prompt(prompt.clone()),
            (None, Some(name)) => EvaluateOptions::principle(name.parse::<DesignPrinciple>()?),
            (None, None) => EvaluateOptions::new(),
        };
        if let Some(path) = &self.template {
            let template = std::fs::read_to_string(path)
                .with_context(|| format!("reading template {}", path.display()))?;
            options = options.with_system_prompt_template(template);
        }
        Ok(options)
    }
}

impl ProviderArgs {
    fn app_config(&self) -> anyhow::Result<AppConfig> {
        if let Some(path) = &self.config {
            return Ok(load_config(path)?);
        }

        let kind: ProviderKind = self.provider.parse()?;
        let mut provider = ProviderConfig::new(kind, self.model.clone());
        provider.base_url = self.base_url.clone();

        Ok(AppConfig {
            provider,
            evaluator: EvaluatorConfig::default(),
            prompts: None,
        })
    }

    fn evaluator(&self) -> anyhow::Result<GraphicDesignEvaluator> {
        let config = self.app_config()?;
        let client = config.provider.build_client()?;
        Ok(GraphicDesignEvaluator::new(client)
            .with_prompts(config.prompt_store()?)
            .with_config(config.evaluator))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    match cli.command {
        Commands::Evaluate {
            image,
            prompt,
            provider,
            samples,
            json,
        } => {
            let options = prompt.options()?;
            let evaluator = provider.evaluator()?;
            let image = DesignImage::open(&image)
                .with_context(|| format!("loading {}", image.display()))?;

            let results = evaluator.sample(&image, options, samples).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for result in &results {
                    println!("{}", result);
                }
                if results.len() > 1 {
                    let mean = results.iter().map(|r| r.score).sum::<f64>() / results.len() as f64;
                    println!("mean score: {:.2}", mean);
                }
            }
            Ok(())
        }
        Commands::Compare {
            image_a,
            image_b,
            prompt,
            provider,
            samples,
            json,
        } => {
            let options = prompt.options()?;
            let evaluator = provider.evaluator()?;
            let a = DesignImage::open(&image_a)
                .with_context(|| format!("loading {}", image_a.display()))?;
            let b = DesignImage::open(&image_b)
                .with_context(|| format!("loading {}", image_b.display()))?;

            let results = evaluator.compare_samples(&a, &b, options, samples).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                for result in &results {
                    println!("better design: {:?}", result.better_design);
                    println!("{}", result.explanation);
                }
            }
            Ok(())
        }
        Commands::Principles => {
            let store = PromptStore::default();
            for principle in DesignPrinciple::ALL {
                println!("== {} ==\n{}\n", principle, store.get_principle_prompt(principle));
            }
            Ok(())
        }
    }
}
