use crate::configuration::{GithubConfigError, Settings};
use crate::domain::{Frontmatter, InlineImage, PostSlug, PublishDate};
use crate::github_client::{CommitError, CommitFile};
use crate::routes::ErrorBody;
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use secrecy::ExposeSecret;

/// Where the static site keeps newsletter posts.
const POSTS_DIR: &str = "src/content/newsletter";
/// Where uploaded thumbnails land; the site serves `public/` from its root.
const UPLOADS_DIR: &str = "public/uploads/newsletter";

#[derive(serde::Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    token: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    thumbnail: String,
    #[serde(default)]
    url: String,
}

#[derive(serde::Deserialize)]
pub struct PublishWithImageRequest {
    #[serde(default)]
    token: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    date: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    image: Option<ImagePayload>,
}

#[derive(serde::Deserialize)]
pub struct ImagePayload {
    #[serde(rename = "dataUrl", default)]
    data_url: String,
}

#[derive(serde::Serialize)]
pub struct PublishedResponse {
    ok: bool,
    path: String,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishedWithImageResponse {
    ok: bool,
    md_path: String,
    img_path: String,
}

#[derive(thiserror::Error)]
pub enum PublishError {
    #[error("Unauthorized")]
    InvalidToken,
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error("{0}")]
    InvalidField(String),
    #[error(transparent)]
    MissingConfiguration(#[from] GithubConfigError),
    #[error(transparent)]
    Commit(#[from] CommitError),
    #[error("Bad request")]
    BadRequest(#[source] JsonRejection),
}

impl std::fmt::Debug for PublishError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for PublishError {
    fn into_response(self) -> Response {
        let status = match &self {
            PublishError::InvalidToken => StatusCode::UNAUTHORIZED,
            PublishError::MissingField(_)
            | PublishError::InvalidField(_)
            | PublishError::BadRequest(_) => StatusCode::BAD_REQUEST,
            PublishError::MissingConfiguration(_) | PublishError::Commit(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("Publishing failed: {:?}", self);
        } else {
            tracing::warn!("Publishing rejected: {:?}", self);
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// A missing ADMIN_TOKEN means nothing can match: publishing stays locked
// rather than open.
fn authorize(settings: &Settings, token: &str) -> Result<(), PublishError> {
    match settings.admin_token() {
        Some(expected) if !token.is_empty() && token == expected.expose_secret().as_str() => Ok(()),
        _ => Err(PublishError::InvalidToken),
    }
}

fn require(value: &str, name: &'static str) -> Result<(), PublishError> {
    if value.is_empty() {
        Err(PublishError::MissingField(name))
    } else {
        Ok(())
    }
}

// Validation only; the submitted string is committed as-is.
fn validate_destination_url(raw: &str) -> Result<(), PublishError> {
    let parsed = url::Url::parse(raw)
        .map_err(|_| PublishError::InvalidField(format!("`{raw}` is not a valid post URL")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(PublishError::InvalidField(format!(
            "post URL must be http or https, got `{}`",
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Publishes a post whose thumbnail is an already-hosted URL: one commit.
#[tracing::instrument(
    name = "Publish newsletter post",
    skip(state, body),
    fields(path = tracing::field::Empty)
)]
pub async fn publish_post(
    State(state): State<AppState>,
    body: Result<Json<PublishRequest>, JsonRejection>,
) -> Result<Json<PublishedResponse>, PublishError> {
    let Json(request) = body.map_err(PublishError::BadRequest)?;
    authorize(&state.settings, &request.token)?;
    require(&request.title, "title")?;
    require(&request.date, "date")?;
    require(&request.summary, "summary")?;
    require(&request.thumbnail, "thumbnail")?;
    require(&request.url, "url")?;
    let date = PublishDate::parse(&request.date).map_err(PublishError::InvalidField)?;

    let github = state.settings.github()?;

    let slug = PostSlug::from_title(&request.title);
    let path = format!("{POSTS_DIR}/{date}-{slug}.md");
    tracing::Span::current().record("path", tracing::field::display(&path));

    let document = Frontmatter {
        title: &request.title,
        date,
        summary: &request.summary,
        thumbnail: &request.thumbnail,
        url: &request.url,
    }
    .to_string();

    github
        .put_file(CommitFile {
            path: &path,
            message: &format!("Add newsletter: {}", request.title),
            content: document.as_bytes(),
        })
        .await?;

    tracing::info!("Newsletter post committed to {}", path);
    Ok(Json(PublishedResponse { ok: true, path }))
}

/// Publishes a post with an inline thumbnail image: the image is committed
/// first, then the Markdown referencing it.
#[tracing::instrument(
    name = "Publish newsletter post with image",
    skip(state, body),
    fields(path = tracing::field::Empty)
)]
pub async fn publish_post_with_image(
    State(state): State<AppState>,
    body: Result<Json<PublishWithImageRequest>, JsonRejection>,
) -> Result<Json<PublishedWithImageResponse>, PublishError> {
    let Json(request) = body.map_err(PublishError::BadRequest)?;
    authorize(&state.settings, &request.token)?;
    require(&request.title, "title")?;
    require(&request.date, "date")?;
    require(&request.summary, "summary")?;
    require(&request.url, "url")?;
    let date = PublishDate::parse(&request.date).map_err(PublishError::InvalidField)?;
    validate_destination_url(&request.url)?;
    let image = request
        .image
        .as_ref()
        .filter(|image| !image.data_url.is_empty())
        .ok_or(PublishError::MissingField("image"))?;
    let image = InlineImage::parse(&image.data_url).map_err(PublishError::InvalidField)?;

    let github = state.settings.github()?;

    let slug = PostSlug::from_title(&request.title);
    let uploaded_at = Utc::now().timestamp_millis();
    let basename = format!("{date}-{slug}-{uploaded_at}.{}", image.format.extension());
    let image_path = format!("{UPLOADS_DIR}/{basename}");
    let post_path = format!("{POSTS_DIR}/{date}-{slug}.md");
    tracing::Span::current().record("path", tracing::field::display(&post_path));
    // The frontmatter reference drops the `public` prefix: that directory is
    // the site root.
    let thumbnail = format!("{}/{basename}", UPLOADS_DIR.trim_start_matches("public"));

    let document = Frontmatter {
        title: &request.title,
        date,
        summary: &request.summary,
        thumbnail: &thumbnail,
        url: &request.url,
    }
    .to_string();

    // The Markdown references the image's path, so the order is fixed: image
    // first, post second, and a failed image commit aborts before the post
    // commit is issued. The reverse failure leaves a committed image without
    // a referencing post; there is no rollback.
    let image_message = format!("Add newsletter image: {}", request.title);
    let post_message = format!("Add newsletter: {}", request.title);
    let steps = [
        CommitFile {
            path: &image_path,
            message: &image_message,
            content: &image.bytes,
        },
        CommitFile {
            path: &post_path,
            message: &post_message,
            content: document.as_bytes(),
        },
    ];
    for step in steps {
        github.put_file(step).await?;
    }

    tracing::info!(
        "Newsletter post committed to {} with image {}",
        post_path,
        image_path
    );
    Ok(Json(PublishedWithImageResponse {
        ok: true,
        md_path: post_path,
        img_path: image_path,
    }))
}
