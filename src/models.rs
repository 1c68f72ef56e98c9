use std::io::Read;
use std::path::Path;

use crate::playback::DEFAULT_TEXT;

/// The text being read and a label for the header bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn welcome() -> Self {
        Self {
            title: "Welcome".to_string(),
            text: DEFAULT_TEXT.to_string(),
        }
    }

    /// Read `source`, where "-" means stdin.
    pub fn open(source: &str) -> eyre::Result<Self> {
        if source == "-" {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            return Ok(Self {
                title: "stdin".to_string(),
                text,
            });
        }

        let path = Path::new(source);
        let text = std::fs::read_to_string(path)
            .map_err(|err| eyre::eyre!("Could not read {}: {}", path.display(), err))?;
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| source.to_string());
        Ok(Self { title, text })
    }
}

/// Which setting a style chooser writes back to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleTarget {
    Display,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Reader,
    Help,
    Settings,
    StyleChooser { target: StyleTarget },
    About,
}

impl Page {
    /// Pages that can only be left, never navigated away from.
    fn is_final(&self) -> bool {
        matches!(self, Page::StyleChooser { .. })
    }

    fn same_kind(&self, other: &Page) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Page history. The reader page is always at the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Router {
    stack: Vec<Page>,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            stack: vec![Page::Reader],
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &Page {
        self.stack.last().unwrap_or(&Page::Reader)
    }

    /// Returns `false` when the page is already on top or the top page is
    /// final.
    pub fn push(&mut self, page: Page) -> bool {
        let current = self.current();
        if current.same_kind(&page) || current.is_final() {
            return false;
        }
        self.stack.push(page);
        true
    }

    pub fn pop(&mut self) -> Option<Page> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_reads_file_and_names_it() -> eyre::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "one two")?;

        let document = Document::open(path.to_str().unwrap())?;
        assert_eq!(document.title, "notes.txt");
        assert_eq!(document.text, "one two");
        Ok(())
    }

    #[test]
    fn test_open_missing_file_fails() {
        assert!(Document::open("/definitely/not/here.txt").is_err());
    }

    #[test]
    fn test_router_starts_at_reader() {
        let router = Router::new();
        assert_eq!(router.current(), &Page::Reader);
    }

    #[test]
    fn test_pop_keeps_root() {
        let mut router = Router::new();
        assert_eq!(router.pop(), None);
        assert_eq!(router.current(), &Page::Reader);
    }

    #[test]
    fn test_push_same_page_is_ignored() {
        let mut router = Router::new();
        assert!(router.push(Page::Settings));
        assert!(!router.push(Page::Settings));
        assert_eq!(router.pop(), Some(Page::Settings));
        assert_eq!(router.pop(), None);
    }

    #[test]
    fn test_final_page_blocks_push() {
        let mut router = Router::new();
        router.push(Page::Settings);
        router.push(Page::StyleChooser {
            target: StyleTarget::Display,
        });

        assert!(!router.push(Page::Help));
        assert_eq!(
            router.pop(),
            Some(Page::StyleChooser {
                target: StyleTarget::Display
            })
        );
        assert_eq!(router.current(), &Page::Settings);
    }
}
