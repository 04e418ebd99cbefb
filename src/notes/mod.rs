pub mod filename;
pub mod frontmatter;
pub mod vault;
