use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use forge_common::telemetry::{self, TelemetryConfig};
use forge_common::{Config, ForgeError};
use forge_renderer::view::Pagination;
use forge_renderer::{EntriesQuery, EntryCollection, PostPage, RelatedPosts, RenderOptions};
use miette::{IntoDiagnostic, Result, WrapErr};

#[derive(Parser)]
#[command(version, about = "Forge - render a saved Contentful blog payload", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the body HTML of every post in a saved `entries` response
    Render {
        /// Path to the JSON response body
        payload: PathBuf,

        /// Only render the post with this slug
        #[arg(long)]
        slug: Option<String>,

        /// HTML-escape text taken from the CMS
        #[arg(long)]
        escape_html: bool,
    },
    /// Print the page view-model of one post as JSON
    Page {
        /// Path to the JSON response body
        payload: PathBuf,

        #[arg(long)]
        slug: String,

        #[arg(long)]
        escape_html: bool,
    },
    /// Print the delivery API url for a query
    Query {
        #[command(subcommand)]
        query: QueryCommand,
    },
}

#[derive(Subcommand)]
enum QueryCommand {
    /// A page of the post listing
    Posts {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// One post by slug
    Post { slug: String },
    /// All categories
    Categories,
    /// Posts in a category
    Category {
        slug: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long, default_value_t = 0)]
        skip: u32,
    },
    /// Full-text search
    Search {
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Total number of posts
    Count,
    /// Posts related to the post with `slug` in a saved payload
    Related {
        payload: PathBuf,
        #[arg(long)]
        slug: String,
        #[arg(long, default_value_t = RelatedPosts::DEFAULT_LIMIT)]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_miette();
    telemetry::init(TelemetryConfig::from_env("forge-cli"));

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command {
        Commands::Render {
            payload,
            slug,
            escape_html,
        } => {
            let collection = load_payload(&payload).await?;
            render_bodies(&collection, slug.as_deref(), RenderOptions { escape_html })?;
        }
        Commands::Page {
            payload,
            slug,
            escape_html,
        } => {
            let collection = load_payload(&payload).await?;
            let posts = collection.posts();
            let post = posts.iter().find(|post| post.slug == slug);
            let page = PostPage::resolve(
                Some(slug.as_str()),
                post,
                &config.site,
                RenderOptions { escape_html },
            )
            .map_err(|panel| miette::miette!("{panel}"))?
            .with_related(&posts);
            let json = serde_json::to_string_pretty(&page).into_diagnostic()?;
            println!("{json}");
        }
        Commands::Query { query } => {
            let query = match query {
                QueryCommand::Posts { page } => EntriesQuery::blog_posts(
                    Pagination::PER_PAGE,
                    (page.max(1) - 1) * Pagination::PER_PAGE,
                ),
                QueryCommand::Post { slug } => EntriesQuery::post_by_slug(&slug),
                QueryCommand::Categories => EntriesQuery::categories(),
                QueryCommand::Category { slug, limit, skip } => {
                    EntriesQuery::posts_by_category(&slug, limit, skip)
                }
                QueryCommand::Search { query, limit } => EntriesQuery::search(&query, limit),
                QueryCommand::Count => EntriesQuery::total_count(),
                QueryCommand::Related {
                    payload,
                    slug,
                    limit,
                } => {
                    let collection = load_payload(&payload).await?;
                    let post = collection
                        .posts()
                        .into_iter()
                        .find(|post| post.slug == slug)
                        .ok_or_else(|| miette::miette!("no post with slug `{slug}` in payload"))?;
                    RelatedPosts::new(&post)
                        .with_limit(limit)
                        .query()
                        .ok_or_else(|| {
                            miette::miette!("post `{slug}` has no category, so nothing is related")
                        })?
                }
            };
            let url = query.url(&config.contentful)?;
            println!("{url}");
        }
    }

    Ok(())
}

async fn load_payload(path: &Path) -> Result<EntryCollection> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(ForgeError::from)
        .wrap_err_with(|| format!("reading {}", path.display()))?;
    let collection = EntryCollection::from_slice(&bytes)?;
    tracing::info!(
        items = collection.items.len(),
        total = collection.total,
        assets = collection.includes.assets().len(),
        entries = collection.includes.entries().len(),
        "loaded payload"
    );
    Ok(collection)
}

fn render_bodies(
    collection: &EntryCollection,
    slug: Option<&str>,
    options: RenderOptions,
) -> Result<()> {
    let posts = collection.posts();
    let mut rendered = 0;
    for post in posts
        .iter()
        .filter(|post| slug.is_none_or(|slug| post.slug == slug))
    {
        tracing::debug!(id = %post.id, slug = %post.slug, "rendering post");
        println!("{}", post.content.to_html(options));
        rendered += 1;
    }

    if rendered == 0 {
        if let Some(slug) = slug {
            return Err(miette::miette!("no post with slug `{slug}` in payload"));
        }
        tracing::warn!("payload has no posts");
    }
    Ok(())
}

fn init_miette() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))
    .expect("couldn't set the miette hook");
    miette::set_panic_hook();
}
