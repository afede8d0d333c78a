//! Page renderers: code-block tables and embed field lists.

use twilight_model::channel::message::embed::Embed;
use twilight_util::builder::embed::{
    EmbedAuthorBuilder, EmbedBuilder, EmbedFieldBuilder, EmbedFooterBuilder, ImageSource,
};

use super::page::{Page, page_start};
use crate::embed::DEFAULT_EMBED_COLOR;

/// Displayable message body produced for a menu.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MenuPayload {
    pub content: Option<String>,
    pub embeds: Vec<Embed>,
}

impl MenuPayload {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            embeds: Vec::new(),
        }
    }

    pub fn embed(embed: Embed) -> Self {
        Self {
            content: None,
            embeds: vec![embed],
        }
    }
}

/// Pagination state handed to a renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PageMeta {
    pub current_page: usize,
    pub per_page: usize,
    /// `None` while a streamed source has not been exhausted.
    pub max_pages: Option<usize>,
    pub known_entries: usize,
}

impl PageMeta {
    /// Global offset of the first entry on the current page.
    pub fn start(&self) -> usize {
        page_start(self.current_page, self.per_page)
    }
}

/// Turns a page into a message payload.
pub trait PageRenderer<T>: Send + Sync {
    fn render(&self, page: &Page<T>, meta: &PageMeta) -> anyhow::Result<MenuPayload>;
}

/// Shared embed chrome for list renderers.
#[derive(Clone, Debug)]
pub struct MenuStyle {
    pub title: String,
    pub color: u32,
    pub icon_url: Option<String>,
    /// Prepend global entry numbers and show the entry caption.
    pub show_index: bool,
}

impl MenuStyle {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            color: DEFAULT_EMBED_COLOR,
            icon_url: None,
            show_index: true,
        }
    }

    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn icon_url(mut self, icon_url: impl Into<String>) -> Self {
        self.icon_url = Some(icon_url.into());
        self
    }

    pub fn show_index(mut self, show_index: bool) -> Self {
        self.show_index = show_index;
        self
    }

    fn builder(&self, entries_on_page: usize, meta: &PageMeta) -> anyhow::Result<EmbedBuilder> {
        let mut author = EmbedAuthorBuilder::new(self.title.clone());
        if let Some(icon_url) = &self.icon_url {
            author = author.icon_url(ImageSource::url(icon_url.clone())?);
        }

        let mut builder = EmbedBuilder::new().color(self.color).author(author.build());
        if self.show_index {
            let caption = entry_caption(meta.start(), entries_on_page, meta.known_entries);
            builder = builder.footer(EmbedFooterBuilder::new(caption).build());
        }

        Ok(builder)
    }
}

/// Footer caption such as `Showing entries 11–20 out of 42`.
pub fn entry_caption(start: usize, count: usize, total: usize) -> String {
    if count == 0 {
        return "No entries".to_owned();
    }

    format!(
        "Showing entries {}–{} out of {}",
        start + 1,
        start + count,
        total
    )
}

fn looks_numeric(cell: &str) -> bool {
    !cell.is_empty() && cell.chars().all(|c| c.is_ascii_digit())
}

fn justify(cell: &str, width: usize) -> String {
    if looks_numeric(cell) {
        format!("{cell:>width$}")
    } else {
        format!("{cell:<width$}")
    }
}

/// Lay out rows as aligned text columns.
///
/// Widths come only from the rows passed in, so each page is sized on its
/// own. Numeric cells are right-aligned, everything else left-aligned.
pub fn render_table(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|column| {
            rows.iter()
                .filter_map(|row| row.get(column))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .map(|(column, cell)| justify(cell, widths[column]))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders each page as a code-block table inside an embed.
pub struct TableRenderer<F> {
    style: MenuStyle,
    format_entry: F,
}

impl<F> TableRenderer<F> {
    /// `format_entry` returns the cells of one row.
    pub fn new(style: MenuStyle, format_entry: F) -> Self {
        Self {
            style,
            format_entry,
        }
    }
}

impl<T, F> PageRenderer<T> for TableRenderer<F>
where
    F: Fn(&T) -> Vec<String> + Send + Sync,
{
    fn render(&self, page: &Page<T>, meta: &PageMeta) -> anyhow::Result<MenuPayload> {
        let start = meta.start();
        let rows: Vec<Vec<String>> = page
            .items()
            .iter()
            .enumerate()
            .map(|(offset, entry)| {
                let cells = (self.format_entry)(entry);
                if self.style.show_index {
                    std::iter::once(format!("{}.", start + offset + 1))
                        .chain(cells)
                        .collect()
                } else {
                    cells
                }
            })
            .collect();

        let description = format!("```\n{}\n```", render_table(&rows));
        let embed = self
            .style
            .builder(page.len(), meta)?
            .description(description)
            .validate()?
            .build();

        Ok(MenuPayload::embed(embed))
    }
}

/// One embed field produced by a [`FieldsRenderer`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MenuField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Renders each entry of a page as its own embed field.
pub struct FieldsRenderer<F> {
    style: MenuStyle,
    format_entry: F,
}

impl<F> FieldsRenderer<F> {
    /// `format_entry` receives the global entry index and the entry.
    pub fn new(style: MenuStyle, format_entry: F) -> Self {
        Self {
            style,
            format_entry,
        }
    }
}

impl<T, F> PageRenderer<T> for FieldsRenderer<F>
where
    F: Fn(usize, &T) -> MenuField + Send + Sync,
{
    fn render(&self, page: &Page<T>, meta: &PageMeta) -> anyhow::Result<MenuPayload> {
        let start = meta.start();
        let mut builder = self.style.builder(page.len(), meta)?;

        for (offset, entry) in page.items().iter().enumerate() {
            let field = (self.format_entry)(start + offset, entry);
            let field_builder = EmbedFieldBuilder::new(field.name, field.value);
            builder = builder.field(if field.inline {
                field_builder.inline()
            } else {
                field_builder
            });
        }

        Ok(MenuPayload::embed(builder.validate()?.build()))
    }
}
