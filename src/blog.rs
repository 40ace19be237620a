use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

pub type PostID = String;

pub const POST_ID_BYTES: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
}

/// A blog post as it is persisted by a [`crate::store::PostStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    pub id: PostID,
    pub title: String,
    pub content: String,
    pub author: Author,

    #[serde(default)]
    pub created: Option<String>,
}

/// The wire shape of a post. The structured author never leaves the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: PostID,
    pub title: String,
    pub content: String,
    pub author: String,
    pub created: Option<String>,
}

/// Fields of a post that passed request validation, before the store gives it an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author: Author,
    pub created: Option<String>,
}

/// The whitelisted fields an update may touch. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<Author>,
    pub created: Option<String>,
}

impl BlogPost {
    pub fn from_new(id: PostID, new_post: NewPost) -> BlogPost {
        BlogPost {
            id,
            title: new_post.title,
            content: new_post.content,
            author: new_post.author,
            created: new_post.created,
        }
    }

    pub fn author_string(&self) -> String {
        format!("{} {}", self.author.first_name, self.author.last_name)
            .trim()
            .to_owned()
    }

    pub fn serialize(&self) -> PostView {
        PostView {
            id: self.id.clone(),
            title: self.title.clone(),
            content: self.content.clone(),
            author: self.author_string(),
            created: self.created.clone(),
        }
    }
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.author.is_none()
            && self.created.is_none()
    }

    pub fn apply(self, post: &mut BlogPost) {
        if let Some(title) = self.title {
            post.title = title;
        }
        if let Some(content) = self.content {
            post.content = content;
        }
        if let Some(author) = self.author {
            post.author = author;
        }
        if let Some(created) = self.created {
            post.created = Some(created);
        }
    }
}

pub fn get_random_hex_string<const LEN: usize>() -> String {
    let mut bytes = [0u8; LEN];
    rand_chacha::ChaCha20Rng::from_entropy().fill_bytes(&mut bytes);

    bytes.iter().fold(String::new(), |mut output, b| {
        let _ = write!(output, "{b:02x}");
        output
    })
}

pub fn new_post_id() -> PostID {
    get_random_hex_string::<POST_ID_BYTES>()
}

pub fn is_valid_post_id(id: &str) -> bool {
    static POST_ID_PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();

    let post_id_pattern = POST_ID_PATTERN.get_or_init(|| {
        regex::Regex::new(&format!("^[0-9a-f]{{{}}}$", POST_ID_BYTES * 2))
            .expect("constant pattern should parse")
    });

    post_id_pattern.is_match(id)
}
