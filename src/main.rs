use anyhow::Context;
use clap::Parser;
use content_admin::config::cli::{
    BlogAction, Command, HighlightAction, MaterialAction, MessageAction,
};
use content_admin::utils::{logger, validation::Validate};
use content_admin::{
    AdminConfig, AdminError, BlogDraft, BlogPost, Cli, CloudinaryUploader, ContentService,
    FetchState, FirebaseAuth, FirestoreStore, Highlight, HighlightCategory, HighlightDraft,
    Message, SessionHandle, SessionManager, StudyMaterial, UploadFile,
};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;

type Service = ContentService<FirestoreStore, CloudinaryUploader>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("Starting content-admin");

    if let Err(e) = run(cli).await {
        tracing::error!("❌ {:#}", e);
        let message = match e.downcast_ref::<AdminError>() {
            Some(admin_error) => admin_error.user_message(),
            None => format!("{:#}", e),
        };
        eprintln!("❌ {}", message);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => AdminConfig::from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => AdminConfig::from_env()?,
    };
    config.validate()?;

    let session = SessionHandle::new();
    let manager = SessionManager::new(FirebaseAuth::from_config(&config.firebase), session.clone());
    match cli.credentials()? {
        Some((email, password)) => {
            manager.sign_in(email, password).await?;
        }
        None => manager.resolve_signed_out(),
    }

    let store = Arc::new(FirestoreStore::from_config(&config.firebase, session.clone()));
    let uploader = Arc::new(CloudinaryUploader::from_config(&config.cloudinary));
    let service: Service = ContentService::new(store, uploader, session);

    let json = cli.json;
    match cli.command {
        Command::Blogs { action } => blogs(&service, action, json).await?,
        Command::Highlights { action } => highlights(&service, action, json).await?,
        Command::Materials { action } => materials(&service, action, json).await?,
        Command::Messages { action } => messages(&service, action, json).await?,
        Command::Upload {
            path,
            resource_type,
            url_only,
        } => {
            let file = read_file(&path).await?;
            let result = service.upload_media(&file, resource_type.into()).await?;
            if url_only {
                println!("{}", result.url);
            } else {
                println!("{}", serde_json::to_string_pretty(&result)?);
            }
        }
    }

    manager.sign_out();
    Ok(())
}

async fn read_file(path: &Path) -> anyhow::Result<UploadFile> {
    UploadFile::from_path(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))
}

fn print_state<E: Serialize>(
    state: &FetchState<E>,
    json: bool,
    line: impl Fn(&E) -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&state.records)?);
    } else if state.records.is_empty() {
        println!("No records found.");
    } else {
        for record in &state.records {
            println!("{}", line(record));
        }
    }
    Ok(())
}

fn blog_line(post: &BlogPost) -> String {
    let tags: Vec<String> = post
        .hashtags
        .iter()
        .map(|t| format!("#{}", t.trim_start_matches('#')))
        .collect();
    format!(
        "{}  {}  {}: {} {}",
        post.id,
        post.created_at,
        post.title,
        post.subtitle,
        tags.join(" ")
    )
}

async fn blogs(service: &Service, action: BlogAction, json: bool) -> anyhow::Result<()> {
    let adapter = service.adapter::<BlogPost>();
    match action {
        BlogAction::List => print_state(&adapter.fetch_all().await, json, blog_line)?,
        BlogAction::Create {
            title,
            subtitle,
            content,
            hashtags,
            image,
        } => {
            let mut draft = BlogDraft::new(title, subtitle, content);
            for tag in &hashtags {
                draft.add_hashtag(tag);
            }
            let image = match image {
                Some(path) => Some(read_file(&path).await?),
                None => None,
            };
            let id = service.create_blog(draft, image.as_ref()).await?;
            println!("✅ Blog published successfully! ({})", id);
        }
        BlogAction::Delete { id } => {
            let state = service.delete_and_refresh(&adapter, &id).await?;
            println!("🗑️  Blog deleted. {} remaining.", state.records.len());
        }
    }
    Ok(())
}

async fn highlights(service: &Service, action: HighlightAction, json: bool) -> anyhow::Result<()> {
    let adapter = service.adapter::<Highlight>();
    match action {
        HighlightAction::List => print_state(&adapter.fetch_all().await, json, |h| {
            format!(
                "{}  {}  [{}] {} ({}, {})",
                h.id, h.created_at, h.category, h.title, h.location, h.year
            )
        })?,
        HighlightAction::Create {
            title,
            description,
            year,
            location,
            category,
            hashtags,
            image,
        } => {
            let category = HighlightCategory::from(category.to_lowercase().as_str());
            if !HighlightCategory::KNOWN.contains(&category) {
                tracing::warn!(category = %category, "Category is not one of the standard set");
            }
            let mut draft = HighlightDraft {
                title,
                description,
                year,
                location,
                category,
                hashtags: Vec::new(),
            };
            for tag in &hashtags {
                draft.add_hashtag(tag);
            }
            let image = match image {
                Some(path) => Some(read_file(&path).await?),
                None => None,
            };
            let id = service.create_highlight(draft, image.as_ref()).await?;
            println!("✅ Highlight added successfully! ({})", id);
        }
        HighlightAction::Delete { id } => {
            let state = service.delete_and_refresh(&adapter, &id).await?;
            println!("🗑️  Highlight deleted. {} remaining.", state.records.len());
        }
    }
    Ok(())
}

async fn materials(service: &Service, action: MaterialAction, json: bool) -> anyhow::Result<()> {
    let adapter = service.adapter::<StudyMaterial>();
    match action {
        MaterialAction::List => print_state(&adapter.fetch_all().await, json, |m| {
            format!(
                "{}  Uploaded: {}  {} ({})  {}",
                m.id, m.uploaded_at, m.name, m.file_type, m.url
            )
        })?,
        MaterialAction::Upload { path } => {
            let file = read_file(&path).await?;
            let id = service.upload_study_material(&file).await?;
            println!("✅ File uploaded successfully! ({})", id);
        }
        MaterialAction::Delete { id } => {
            let state = service.delete_and_refresh(&adapter, &id).await?;
            println!("🗑️  File deleted. {} remaining.", state.records.len());
        }
    }
    Ok(())
}

async fn messages(service: &Service, action: MessageAction, json: bool) -> anyhow::Result<()> {
    let adapter = service.adapter::<Message>();
    match action {
        MessageAction::List => print_state(&adapter.fetch_all().await, json, |m| {
            format!(
                "{}  {}  {} <{}>: {}",
                m.id, m.created_at, m.name, m.email, m.subject
            )
        })?,
        MessageAction::Delete { id } => {
            let state = service.delete_and_refresh(&adapter, &id).await?;
            println!("🗑️  Message deleted. {} remaining.", state.records.len());
        }
    }
    Ok(())
}
