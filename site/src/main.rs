use clap::{Parser, Subcommand};
use content::listing;
use content::prelude::*;
use site::render;
use site::{SiteError, SiteSettings};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "site")]
#[command(about = "Browse the agency site's content from the command line")]
struct Cli {
    /// Settings file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Override the content API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,
    /// Print resolved items as JSON
    #[arg(long, global = true)]
    json: bool,
    /// Show at most this many items
    #[arg(short, long, global = true)]
    limit: Option<usize>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List blog posts
    Posts,
    /// List services
    Services,
    /// List portfolio entries
    Portfolio {
        /// Only show one category (web-design, seo, branding, e-commerce, or all)
        #[arg(long)]
        category: Option<String>,
    },
    /// Show one blog post by slug or id, with related posts
    Post { slug: String },
    /// Show one portfolio project by slug or id, with related projects
    Project { slug: String },
    /// Show a static page by slug
    Page { slug: String },
    /// Resolve an arbitrary collection URL
    Fetch {
        url: String,
        /// Resolve images the way portfolio entries are resolved
        #[arg(long)]
        portfolio: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings =
        SiteSettings::load_or_default(cli.config.as_deref())?.with_base_url(cli.base_url)?;

    let limit = cli.limit;
    let result = match cli.command {
        Commands::Posts => list(&settings, Collection::Posts, None, limit, cli.json).await,
        Commands::Services => list(&settings, Collection::Services, None, limit, cli.json).await,
        Commands::Portfolio { category } => {
            list(
                &settings,
                Collection::Portfolio,
                category.as_deref(),
                limit,
                cli.json,
            )
            .await
        }
        Commands::Post { slug } => detail(&settings, Collection::Posts, &slug, cli.json).await,
        Commands::Project { slug } => {
            detail(&settings, Collection::Portfolio, &slug, cli.json).await
        }
        Commands::Page { slug } => page(&settings, &slug).await,
        Commands::Fetch { url, portfolio } => {
            fetch(&settings, &url, portfolio, limit, cli.json).await
        }
    };

    result.map_err(Into::into)
}

async fn list(
    settings: &SiteSettings,
    collection: Collection,
    category: Option<&str>,
    limit: Option<usize>,
    json: bool,
) -> Result<(), SiteError> {
    let resolver = settings.listing_resolver(collection, category)?;
    let mut resource = ContentResource::with_options(resolver, settings.request_options());
    resource.set_url(collection.url(&settings.content));

    let state = resource.settled().await;
    let items = render::visible_items(&state, collection, category, limit)?;
    info!("Showing {} {}", items.len(), collection.path());

    if json {
        println!("{}", render::to_json(&items)?);
    } else {
        println!("{}", render::cards(collection, &items));
    }
    Ok(())
}

async fn detail(
    settings: &SiteSettings,
    collection: Collection,
    key: &str,
    json: bool,
) -> Result<(), SiteError> {
    let resolver = settings.resolver_for(collection)?;
    let payload = resolver
        .resolve(&collection.url(&settings.content), &settings.request_options())
        .await?;
    let items = payload.items();

    let item = listing::find_by_slug_or_id(items, key).ok_or_else(|| SiteError::NotFound {
        what: match collection {
            Collection::Portfolio => "Project",
            _ => "Post",
        },
        key: key.to_string(),
    })?;
    let related = listing::related(items, Some(item.id()), render::RELATED_LIMIT);

    if json {
        println!("{}", render::to_json(item)?);
    } else if collection == Collection::Portfolio {
        println!("{}", render::project_detail(item, &related));
    } else {
        println!("{}", render::post_detail(item, &related));
    }
    Ok(())
}

async fn page(settings: &SiteSettings, slug: &str) -> Result<(), SiteError> {
    let resolver = settings.resolver_for(Collection::Pages)?;
    let url = settings.page_url(slug)?;
    let value = resolver.fetch_json(&url, &settings.request_options()).await?;

    let page = value
        .as_array()
        .and_then(|pages| pages.first())
        .ok_or_else(|| SiteError::NotFound {
            what: "Page",
            key: slug.to_string(),
        })?;

    let title = page["title"]["rendered"].as_str().unwrap_or_default();
    let body = page["content"]["rendered"].as_str().unwrap_or_default();
    println!("{}\n\n{}", listing::strip_html(title), listing::strip_html(body).trim());
    Ok(())
}

async fn fetch(
    settings: &SiteSettings,
    url: &str,
    portfolio: bool,
    limit: Option<usize>,
    json: bool,
) -> Result<(), SiteError> {
    let (collection, profile) = if portfolio {
        (Collection::Portfolio, ResolverProfile::portfolio())
    } else {
        (Collection::Posts, ResolverProfile::content())
    };
    let resolver = settings.resolver(profile)?;
    let payload = resolver.resolve(url, &settings.request_options()).await?;
    let items: Vec<&EnrichedItem> = payload
        .items()
        .iter()
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    if json && limit.is_none() {
        println!("{}", render::to_json(&payload)?);
    } else if json {
        println!("{}", render::to_json(&items)?);
    } else {
        println!("{}", render::cards(collection, &items));
    }
    Ok(())
}
