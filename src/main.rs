use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use imagegate::{
    logger, DiffusionOptions, EditorPayload, GatewayClient, GatewayConfig, GeneratedImage,
    ImageModel, InpaintOptions, InpaintSchema, LucidOriginOptions, MaskInput, Outcome,
};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about = "Talk to the image-generation backend", long_about = None)]
struct Cli {
    /// Backend base URL, overrides API_BASE_URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Text-to-image generation
    Generate {
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long, default_value_t = 4)]
        steps: u32,
        #[arg(short, long, default_value_t = ImageModel::default_text_to_image())]
        model: ImageModel,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Stable Diffusion XL text-to-image
    Sdxl {
        #[arg(short, long)]
        prompt: String,
        #[command(flatten)]
        sampling: SamplingArgs,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Generate a new image guided by a source image
    Img2img {
        #[arg(long)]
        image: PathBuf,
        #[arg(short, long)]
        prompt: String,
        #[command(flatten)]
        sampling: SamplingArgs,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Leonardo Lucid Origin text-to-image
    Lucid {
        #[arg(short, long)]
        prompt: String,
        #[arg(short, long, default_value_t = 8)]
        steps: u32,
        #[arg(long, default_value_t = 4.5)]
        guidance: f32,
        #[arg(long, default_value_t = 1120)]
        width: u32,
        #[arg(long, default_value_t = 1120)]
        height: u32,
        #[arg(long)]
        seed: Option<i64>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Regenerate the masked region of an image
    Inpaint(InpaintArgs),
    /// List the URLs of stored images
    Gallery,
    /// Show one stored image record
    Image {
        #[arg(long)]
        id: String,
    },
    /// Delete one stored image
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Edit an image the backend fetches by URL
    Edit {
        #[arg(short, long)]
        prompt: String,
        /// Local image, uploaded to the image host first
        #[arg(long, conflicts_with = "url")]
        image: Option<PathBuf>,
        #[arg(long)]
        url: Option<String>,
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show the supported models
    Models,
}

/// Sampler settings shared by the SDXL and image-to-image commands.
/// Anything left out keeps the preset of the command.
#[derive(Args, Debug)]
struct SamplingArgs {
    #[arg(long)]
    negative_prompt: Option<String>,
    #[arg(short, long)]
    steps: Option<u32>,
    #[arg(long)]
    strength: Option<f32>,
    #[arg(long)]
    guidance: Option<f32>,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    height: Option<u32>,
    #[arg(long)]
    seed: Option<i64>,
}

impl SamplingArgs {
    fn apply(&self, mut options: DiffusionOptions) -> DiffusionOptions {
        if let Some(negative) = &self.negative_prompt {
            options = options.with_negative_prompt(negative.clone());
        }
        if let Some(steps) = self.steps {
            options = options.with_steps(steps);
        }
        if let Some(strength) = self.strength {
            options = options.with_strength(strength);
        }
        if let Some(guidance) = self.guidance {
            options = options.with_guidance(guidance);
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            options = options.with_size(width, height);
        }
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        options
    }

    fn has_size(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }
}

#[derive(Args, Debug)]
struct InpaintArgs {
    #[arg(long)]
    image: PathBuf,
    /// Flat mask image
    #[arg(long, conflicts_with_all = ["composite", "layer", "background"])]
    mask: Option<PathBuf>,
    /// Editor composite layer
    #[arg(long)]
    composite: Option<PathBuf>,
    /// Editor stroke layer, may be repeated
    #[arg(long)]
    layer: Vec<PathBuf>,
    /// Editor background layer
    #[arg(long)]
    background: Option<PathBuf>,
    #[arg(short, long)]
    prompt: String,
    #[arg(long)]
    negative_prompt: Option<String>,
    #[arg(short, long, default_value_t = 4)]
    steps: u32,
    #[arg(long, default_value_t = 0.8)]
    strength: f32,
    #[arg(long, default_value_t = 7.5)]
    guidance: f32,
    #[arg(long, default_value_t = 512)]
    width: u32,
    #[arg(long, default_value_t = 512)]
    height: u32,
    #[arg(long)]
    seed: Option<i64>,
    #[arg(short, long, default_value_t = ImageModel::default_inpainting())]
    model: ImageModel,
    /// legacy or mask-array, overrides INPAINT_SCHEMA
    #[arg(long)]
    schema: Option<InpaintSchema>,
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl InpaintArgs {
    fn options(&self) -> InpaintOptions {
        let mut options = InpaintOptions::new()
            .with_model(self.model)
            .with_steps(self.steps)
            .with_strength(self.strength)
            .with_guidance(self.guidance)
            .with_size(self.width, self.height);
        if let Some(negative) = &self.negative_prompt {
            options = options.with_negative_prompt(negative.clone());
        }
        if let Some(seed) = self.seed {
            options = options.with_seed(seed);
        }
        options
    }

    async fn mask_input(&self) -> std::io::Result<Option<MaskInput>> {
        if let Some(path) = &self.mask {
            return Ok(Some(MaskInput::Image(tokio::fs::read(path).await?)));
        }
        if self.composite.is_none() && self.layer.is_empty() && self.background.is_none() {
            return Ok(None);
        }

        let mut payload = EditorPayload::new();
        if let Some(path) = &self.composite {
            payload = payload.with_composite(tokio::fs::read(path).await?);
        }
        for path in &self.layer {
            payload = payload.with_layer(tokio::fs::read(path).await?);
        }
        if let Some(path) = &self.background {
            payload = payload.with_background(tokio::fs::read(path).await?);
        }
        Ok(Some(MaskInput::Editor(payload)))
    }
}

fn default_output(prefix: &str, image: &GeneratedImage) -> PathBuf {
    PathBuf::from(format!(
        "{}_{}.{}",
        prefix,
        chrono::Utc::now().format("%Y%m%d_%H%M%S"),
        image.extension()
    ))
}

fn deliver(
    outcome: Outcome<GeneratedImage>,
    out: Option<PathBuf>,
    prefix: &str,
) -> std::io::Result<()> {
    match outcome {
        Outcome::Done(image) => {
            let path = out.unwrap_or_else(|| default_output(prefix, &image));
            image.save(&path)?;
            println!("{}", path.display());
            imagegate::log_info!("Saved {} bytes to {}", image.len(), path.display());
        }
        Outcome::Warning(message) => print_warning(&message),
    }
    Ok(())
}

fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠️  Warning:".yellow().bold(), message);
}

async fn read_optional(path: Option<&Path>) -> std::io::Result<Option<Vec<u8>>> {
    match path {
        Some(path) => Ok(Some(tokio::fs::read(path).await?)),
        None => Ok(None),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    logger::init()?;
    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    if !dotenv_loaded {
        log::debug!("No .env file found, using system environment variables");
    }

    let cli = Cli::parse();

    let mut config = GatewayConfig::from_env();
    if let Some(base) = cli.api_base_url {
        config = config.with_base_url(base);
    }
    if let Command::Inpaint(InpaintArgs {
        schema: Some(schema),
        ..
    }) = &cli.command
    {
        config = config.with_inpaint_schema(*schema);
    }
    logger::log_config_info(&config);

    let client = GatewayClient::new(config)?;

    match cli.command {
        Command::Generate {
            prompt,
            steps,
            model,
            out,
        } => {
            let outcome = client.generate_image(&prompt, steps, model).await;
            deliver(outcome, out, "generated")?;
        }
        Command::Sdxl {
            prompt,
            sampling,
            out,
        } => {
            let options = sampling.apply(DiffusionOptions::sdxl());
            let outcome = client.sdxl_image(&prompt, &options).await;
            deliver(outcome, out, "sdxl")?;
        }
        Command::Img2img {
            image,
            prompt,
            sampling,
            out,
        } => {
            let source = tokio::fs::read(&image).await?;
            let mut options = DiffusionOptions::image_to_image();
            if !sampling.has_size() {
                options = match options.with_size_of(&source) {
                    Ok(options) => options,
                    Err(e) => {
                        print_warning(&e.user_message());
                        return Ok(());
                    }
                };
            }
            let options = sampling.apply(options);
            let outcome = client
                .image_to_image(Some(source.as_slice()), &prompt, &options)
                .await;
            deliver(outcome, out, "img2img")?;
        }
        Command::Lucid {
            prompt,
            steps,
            guidance,
            width,
            height,
            seed,
            out,
        } => {
            let mut options = LucidOriginOptions::new()
                .with_steps(steps)
                .with_guidance(guidance)
                .with_size(width, height);
            if let Some(seed) = seed {
                options = options.with_seed(seed);
            }
            let outcome = client.lucid_origin_image(&prompt, &options).await;
            deliver(outcome, out, "lucid")?;
        }
        Command::Inpaint(args) => {
            let image = tokio::fs::read(&args.image).await?;
            let mask = args.mask_input().await?;
            let outcome = client
                .inpaint_image(Some(image.as_slice()), mask.as_ref(), &args.prompt, &args.options())
                .await;
            deliver(outcome, args.out, "inpainted")?;
        }
        Command::Gallery => match client.list_images().await {
            Outcome::Done(urls) => {
                for url in urls {
                    println!("{}", url);
                }
            }
            Outcome::Warning(message) => print_warning(&message),
        },
        Command::Image { id } => match client.get_image(&id).await {
            Outcome::Done(record) => println!("{}", serde_json::to_string_pretty(&record)?),
            Outcome::Warning(message) => print_warning(&message),
        },
        Command::Delete { id } => match client.delete_image(&id).await {
            Outcome::Done(()) => println!("Deleted {}", id.trim()),
            Outcome::Warning(message) => print_warning(&message),
        },
        Command::Edit {
            prompt,
            image,
            url,
            out,
        } => {
            let local = read_optional(image.as_deref()).await?;
            let outcome = client
                .edit_by_url(&prompt, local.as_deref(), url.as_deref())
                .await;
            deliver(outcome, out, "edited")?;
        }
        Command::Models => {
            for model in client.supported_models() {
                println!(
                    "{:<52} {:<36} {:?}",
                    model.id.bold(),
                    format!("{} ({})", model.name, model.provider),
                    model.category
                );
            }
        }
    }

    Ok(())
}
