use crate::api::NewPost;

pub const TITLE_MIN: usize = 5;
pub const TITLE_MAX: usize = 100;
pub const WORDS_MIN: usize = 1;
pub const WORDS_MAX: usize = 500;
pub const TAG_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    TitleLength,
    WordCount,
    MissingCategory,
}

impl DraftError {
    pub fn message(self) -> &'static str {
        match self {
            DraftError::TitleLength => "Title must be between 5 and 100 characters.",
            DraftError::WordCount => "Content must be between 1 and 500 words.",
            DraftError::MissingCategory => "Please choose a category.",
        }
    }
}

/// Tags in entry order, trimmed and de-duplicated. Input beyond [`TAG_LIMIT`] is ignored
/// rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Returns whether the tag was taken.
    pub fn add(&mut self, input: &str) -> bool {
        let tag = input.trim();
        if tag.is_empty() || self.is_full() || self.0.iter().any(|t| t == tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    pub fn is_full(&self) -> bool {
        self.0.len() >= TAG_LIMIT
    }

    /// Parse the comma-separated tag field of the form.
    pub fn parse(field: &str) -> Self {
        let mut tags = TagSet::default();
        for part in field.split(',') {
            tags.add(part);
        }
        tags
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// A blog post as entered in the creation form.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub category: String,
    pub image_url: String,
    pub tags: TagSet,
}

pub fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

impl Draft {
    pub fn validate(&self) -> Result<(), DraftError> {
        let title_len = self.title.trim().chars().count();
        if !(TITLE_MIN..=TITLE_MAX).contains(&title_len) {
            return Err(DraftError::TitleLength);
        }
        let words = word_count(&self.content);
        if !(WORDS_MIN..=WORDS_MAX).contains(&words) {
            return Err(DraftError::WordCount);
        }
        if self.category.trim().is_empty() {
            return Err(DraftError::MissingCategory);
        }
        Ok(())
    }

    /// Validate and build the create request for `author_id`.
    pub fn into_new_post(self, author_id: &str) -> Result<NewPost, DraftError> {
        self.validate()?;
        Ok(NewPost {
            title: self.title.trim().to_string(),
            blog_content: self.content,
            author_id: author_id.to_string(),
            tags: self.tags.into_vec(),
            blog_image: self.image_url.trim().to_string(),
            category: self.category.trim().to_string(),
        })
    }
}
