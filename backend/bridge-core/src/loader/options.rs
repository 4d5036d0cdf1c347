use crate::config::LoaderDefaults;
use crate::error::loader::LoaderError;
use crate::loader::events::{EventHandlers, HandlerError, LoaderEvent};

use models::LoaderEventType;

use common::ErrorLocation;

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

pub const URL_REQUIRED_MESSAGE: &str = "The \"options.url\" value should be a non-empty string.";

/// Where the loader's root element is appended.
#[derive(Debug, Clone, PartialEq)]
pub enum ParentRef<E> {
    Selector(String),
    Element(E),
}

impl<E> Display for ParentRef<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        match self {
            ParentRef::Selector(selector) => f.write_str(selector),
            ParentRef::Element(_) => f.write_str("[element]"),
        }
    }
}

#[derive(Debug)]
pub struct LoaderOptions<E> {
    pub url: String,
    pub parent: Option<ParentRef<E>>,
    pub events: EventHandlers<E>,
    /// Set on the iframe before `src`.
    pub iframe_attributes: BTreeMap<String, String>,
}

impl<E> LoaderOptions<E> {
    #[track_caller]
    pub fn validate(&self) -> Result<(), LoaderError> {
        if self.url.is_empty() {
            return Err(LoaderError::Options {
                message: URL_REQUIRED_MESSAGE.to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct LoaderOptionsBuilder<E> {
    url: Option<String>,
    parent: Option<ParentRef<E>>,
    events: EventHandlers<E>,
    iframe_attributes: BTreeMap<String, String>,
}

impl<E> Default for LoaderOptionsBuilder<E> {
    fn default() -> Self {
        Self {
            url: None,
            parent: None,
            events: EventHandlers::default(),
            iframe_attributes: BTreeMap::new(),
        }
    }
}

impl<E> LoaderOptionsBuilder<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_parent_selector(mut self, selector: impl Into<String>) -> Self {
        self.parent = Some(ParentRef::Selector(selector.into()));
        self
    }

    pub fn with_parent_element(mut self, element: E) -> Self {
        self.parent = Some(ParentRef::Element(element));
        self
    }

    pub fn with_event<F>(mut self, kind: LoaderEventType, handler: F) -> Self
    where
        F: FnMut(&LoaderEvent<'_, E>) -> Result<(), HandlerError> + 'static,
    {
        self.events.on(kind, handler);
        self
    }

    pub fn with_iframe_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.iframe_attributes.insert(name.into(), value.into());
        self
    }

    /// Fill what is still unset from persisted defaults. Explicit values win.
    pub fn with_defaults(mut self, defaults: &LoaderDefaults) -> Self {
        if self.parent.is_none()
            && let Some(selector) = &defaults.parent_selector
        {
            self.parent = Some(ParentRef::Selector(selector.clone()));
        }

        for (name, value) in &defaults.iframe_attributes {
            self.iframe_attributes
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }

        self
    }

    #[track_caller]
    pub fn build(self) -> Result<LoaderOptions<E>, LoaderError> {
        let options = LoaderOptions {
            url: self.url.unwrap_or_default(),
            parent: self.parent,
            events: self.events,
            iframe_attributes: self.iframe_attributes,
        };
        options.validate()?;
        Ok(options)
    }
}
