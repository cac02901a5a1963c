mod frontmatter;
mod inline_image;
mod post_slug;
mod publish_date;

pub use frontmatter::{Frontmatter, yaml_single_quoted};
pub use inline_image::{ImageFormat, InlineImage};
pub use post_slug::PostSlug;
pub use publish_date::PublishDate;
