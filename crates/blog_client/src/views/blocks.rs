//! crates/blog_client/src/views/blocks.rs
//!
//! Renders editor blocks to HTML. Block text is editor-produced inline HTML
//! and is emitted as is; attribute values go through maud's escaping.

use blog_core::{Content, ContentBlock, HeaderLevel};
use maud::{html, Markup, PreEscaped};

pub fn render_block(block: &ContentBlock) -> Markup {
    match block {
        ContentBlock::Paragraph { text } => html! {
            p class="!mb-3 text-xl" { (PreEscaped(text)) }
        },
        ContentBlock::Header {
            level: HeaderLevel::Subsection,
            text,
        } => html! {
            h3 class="text-3xl font-bold" { (PreEscaped(text)) }
        },
        ContentBlock::Header { text, .. } => html! {
            h2 class="text-4xl font-bold" { (PreEscaped(text)) }
        },
        ContentBlock::Image { url, caption } => html! {
            div class="w-full" {
                img class="w-full" src=(url) alt=(caption);
                @if !caption.is_empty() {
                    p class="!mt-3 w-full text-center my-3 md:mb-12 text-base text-gray-400" {
                        (PreEscaped(caption))
                    }
                }
            }
        },
        ContentBlock::Quote { text, caption } => html! {
            div class="bg-purple/10 p-3 pl-5 border-l-4 border-purple" {
                p class="text-xl leading-10 md:text-2xl" { (PreEscaped(text)) }
                @if !caption.is_empty() {
                    p class="w-full text-purple text-base" { (PreEscaped(caption)) }
                }
            }
        },
        ContentBlock::List { ordered: true, items } => html! {
            ol class="pl-5 list-decimal" {
                @for item in items {
                    li class="my-4" { (PreEscaped(item)) }
                }
            }
        },
        ContentBlock::List { items, .. } => html! {
            ul class="pl-5 list-disc" {
                @for item in items {
                    li class="my-4" { (PreEscaped(item)) }
                }
            }
        },
        ContentBlock::Unknown { .. } => html! {},
    }
}

pub fn render_content(content: &Content) -> Markup {
    html! {
        @for block in &content.blocks {
            div class="my-4 md:my-8" { (render_block(block)) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(block: ContentBlock) -> String {
        render_block(&block).into_string()
    }

    #[test]
    fn headers_have_exactly_two_sizes() {
        assert_eq!(
            render(ContentBlock::header(3, "Sub")),
            r#"<h3 class="text-3xl font-bold">Sub</h3>"#
        );
        for level in [1, 2, 4, 6] {
            assert_eq!(
                render(ContentBlock::header(level, "Top")),
                r#"<h2 class="text-4xl font-bold">Top</h2>"#
            );
        }
    }

    #[test]
    fn lists_pick_tag_and_numbering_class() {
        let ordered = render(ContentBlock::List {
            ordered: true,
            items: vec!["a".into()],
        });
        assert_eq!(ordered, r#"<ol class="pl-5 list-decimal"><li class="my-4">a</li></ol>"#);

        let unordered = render(ContentBlock::List {
            ordered: false,
            items: vec!["a".into(), "b".into()],
        });
        assert!(unordered.starts_with(r#"<ul class="pl-5 list-disc">"#));
        assert_eq!(unordered.matches("<li").count(), 2);
    }

    #[test]
    fn captions_only_render_when_present() {
        let bare = render(ContentBlock::Image {
            url: "https://cdn/x.png".into(),
            caption: String::new(),
        });
        assert!(!bare.contains("<p"));

        let captioned = render(ContentBlock::Quote {
            text: "To be".into(),
            caption: "Hamlet".into(),
        });
        assert!(captioned.contains(r#"<p class="w-full text-purple text-base">Hamlet</p>"#));
    }

    #[test]
    fn image_attributes_are_escaped() {
        let html = render(ContentBlock::Image {
            url: "https://cdn/x.png".into(),
            caption: r#"a "quoted" caption"#.into(),
        });
        assert!(html.contains(r#"alt="a &quot;quoted&quot; caption""#));
    }

    #[test]
    fn unknown_blocks_render_nothing() {
        let block: ContentBlock =
            serde_json::from_value(json!({ "type": "embed", "data": {} })).unwrap();
        assert_eq!(render(block), "");
    }

    #[test]
    fn inline_markup_in_text_is_kept() {
        assert_eq!(
            render(ContentBlock::paragraph("a <b>bold</b> move")),
            r#"<p class="!mb-3 text-xl">a <b>bold</b> move</p>"#
        );
    }
}
