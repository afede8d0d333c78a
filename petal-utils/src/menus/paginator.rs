//! Paginated list menus.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::action::{Action, ActionSpec, PAGINATOR_ACTIONS};
use super::controller::{Menu, MenuBehavior, MenuCore};
use super::error::MenuError;
use super::page::clamp_page;
use super::render::{MenuPayload, PageMeta, PageRenderer};
use super::source::PageSource;

/// A menu that flips through the pages of a [`PageSource`].
pub type Paginator<S, R> = Menu<PageView<S, R>>;

/// Paginator state: the source, its renderer and the page on display.
pub struct PageView<S, R> {
    source: S,
    renderer: R,
    current_page: AtomicUsize,
}

impl<S, R> PageView<S, R>
where
    S: PageSource,
    R: PageRenderer<S::Item>,
{
    pub fn new(source: S, renderer: R) -> Self {
        Self {
            source,
            renderer,
            current_page: AtomicUsize::new(0),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn current_page(&self) -> usize {
        self.current_page.load(Ordering::Acquire)
    }

    async fn render_page(&self, index: usize) -> Result<MenuPayload, anyhow::Error> {
        let page = self.source.get_page(index).await?;
        let meta = PageMeta {
            current_page: page.index(),
            per_page: self.source.per_page(),
            max_pages: self.source.max_pages(),
            known_entries: self.source.known_entries(),
        };

        self.renderer.render(&page, &meta)
    }

    /// Render `index` into the bound message and make it current.
    async fn show_page(&self, menu: &MenuCore, index: usize) -> anyhow::Result<()> {
        if index == self.current_page() {
            return Ok(());
        }

        let payload = self.render_page(index).await?;
        menu.edit(&payload).await?;
        self.current_page.store(index, Ordering::Release);
        Ok(())
    }

    /// Resolve the page an action leads to, saturating at both ends.
    async fn target_page(&self, action: Action) -> Result<Option<usize>, MenuError> {
        let current = self.current_page();

        let target = match action {
            Action::First => 0,
            Action::Previous => current.saturating_sub(1),
            Action::Next => {
                let next = current + 1;
                match self.source.max_pages() {
                    Some(max_pages) => clamp_page(next, max_pages),
                    // Unknown length: ask the stream for the next page.
                    None => match self.source.get_page(next).await {
                        Ok(_) => next,
                        Err(MenuError::OutOfRange { .. }) => current,
                        Err(error) => return Err(error),
                    },
                }
            }
            Action::Last => self.source.last_page().await?,
            _ => return Ok(None),
        };

        Ok(Some(target))
    }
}

#[async_trait]
impl<S, R> MenuBehavior for PageView<S, R>
where
    S: PageSource,
    R: PageRenderer<S::Item>,
{
    async fn initial_payload(&self) -> anyhow::Result<MenuPayload> {
        self.source.prepare().await?;
        self.render_page(0).await
    }

    fn actions(&self) -> Vec<ActionSpec> {
        if !self.source.is_paginating() {
            return Vec::new();
        }

        // First/last only earn their place with more than two known pages.
        let skip_jumps = self.source.max_pages().is_some_and(|max| max <= 2);

        PAGINATOR_ACTIONS
            .into_iter()
            .filter(|spec| !(skip_jumps && matches!(spec.action, Action::First | Action::Last)))
            .collect()
    }

    async fn on_action(&self, menu: &MenuCore, action: Action) -> anyhow::Result<()> {
        if action == Action::Stop {
            menu.stop();
            return Ok(());
        }

        if let Some(target) = self.target_page(action).await? {
            self.show_page(menu, target).await?;
        }

        Ok(())
    }
}

impl<S, R> Menu<PageView<S, R>>
where
    S: PageSource,
    R: PageRenderer<S::Item>,
{
    pub fn current_page(&self) -> usize {
        self.behavior().current_page()
    }
}
