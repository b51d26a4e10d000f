//! # Schema Introspection
//!
//! A static catalog of the properties each node type accepts, for clients
//! that build documents programmatically, and a sample document that
//! exercises the text, row and column node types.

use serde_json::{json, Value};

use crate::model::{
    Container, ContentNode, Document, Margins, Orientation, PageGeometry, PageSize, TextNode,
};
use crate::style::{Color, FontName, TextAlign};

const ALIGNMENTS: [&str; 3] = ["left", "center", "right"];

/// Recognized property names and their allowed values, per node type.
pub fn properties() -> Value {
    let fonts: Vec<&str> = FontName::ALL.iter().map(|f| f.pdf_name()).collect();
    json!({
        "text": {
            "type": ["text"],
            "content": ["string"],
            "font": fonts,
            "size": ["number"],
            "align": ALIGNMENTS,
            "color": ["string"],
            "lineGap": ["number"],
            "width": ["number"],
            "height": ["number"],
            "backgroundColor": ["string"],
        },
        "image": {
            "type": ["image"],
            "content": ["string"],
            "width": ["number"],
            "height": ["number"],
            "align": ALIGNMENTS,
            "backgroundColor": ["string"],
        },
        "row": {
            "type": ["row"],
            "childs": ["array"],
            "height": ["number"],
            "backgroundColor": ["string"],
        },
        "column": {
            "type": ["column"],
            "childs": ["array"],
            "height": ["number"],
            "backgroundColor": ["string"],
        },
        "page": {
            "margins": {
                "left": ["number"],
                "right": ["number"],
                "bottom": ["number"],
                "top": ["number"],
            },
            "orientation": ["portrait", "landscape"],
            "page": ["a4", "letter", "legal"],
        },
        "headerFooter": {
            "content": ["array"],
        },
    })
}

/// [`properties`] wrapped in the `{statusCode, message, data}` envelope
/// HTTP clients expect.
pub fn properties_response() -> Value {
    json!({
        "statusCode": 200,
        "message": "Properties retrieved successfully",
        "data": properties(),
    })
}

/// A landscape sales report with a header row, regional columns and a
/// footer.
pub fn example_document() -> Document {
    let navy = hex("#2C3E50");
    let red = hex("#E74C3C");
    let blue = hex("#2980B9");
    let slate = hex("#34495E");
    let grey = hex("#7F8C8D");

    let region = |name: &str, total: &str, ticket: &str, orders: &str, growth: &str| {
        ContentNode::column(vec![
            styled(name, FontName::HelveticaBold, 18.0, TextAlign::Left, red),
            styled("Overview", FontName::HelveticaBold, 14.0, TextAlign::Left, blue),
            styled(
                &format!(
                    "\u{2022} Total sales: ${}\n\u{2022} Average ticket: ${}\n\u{2022} Orders: {}\n\u{2022} Growth: {}",
                    total, ticket, orders, growth
                ),
                FontName::Helvetica,
                12.0,
                TextAlign::Left,
                slate,
            ),
        ])
    };

    let header = vec![ContentNode::row(vec![
        styled("EXAMPLE COMPANY INC.", FontName::HelveticaBold, 14.0, TextAlign::Left, navy),
        styled("SALES REPORT", FontName::HelveticaBold, 14.0, TextAlign::Center, navy),
        styled("Date: 2025-01-21", FontName::Helvetica, 12.0, TextAlign::Right, grey),
    ])];

    let mut summary = Container::new(vec![
        styled("Summary", FontName::HelveticaBold, 16.0, TextAlign::Left, navy),
        styled(
            "All regions grew year over year. The southeast remains the largest market, \
             while the north shows the fastest growth from a smaller base.",
            FontName::Helvetica,
            12.0,
            TextAlign::Left,
            slate,
        ),
    ]);
    summary.background_color = Some(hex("#ECF0F1"));
    summary.height = Some(80.0);

    let body = vec![
        styled(
            "Sales by Region",
            FontName::HelveticaBold,
            24.0,
            TextAlign::Center,
            navy,
        ),
        ContentNode::row(vec![
            region("SOUTH", "1,500,000.00", "750.00", "2,000", "15%"),
            region("SOUTHEAST", "2,800,000.00", "850.00", "3,294", "8%"),
            region("NORTH", "900,000.00", "600.00", "1,500", "22%"),
        ]),
        ContentNode::Column(summary),
    ];

    let footer = vec![ContentNode::row(vec![
        styled("Confidential", FontName::HelveticaOblique, 10.0, TextAlign::Left, grey),
        styled("Generated by folio", FontName::Helvetica, 10.0, TextAlign::Right, grey),
    ])];

    Document::new(
        PageGeometry::new(PageSize::A4, Orientation::Landscape, Margins::uniform(1.0)),
        body,
    )
    .with_header(header)
    .with_footer(footer)
}

fn styled(content: &str, font: FontName, size: f64, align: TextAlign, color: Color) -> ContentNode {
    ContentNode::Text(TextNode {
        text: content.to_string(),
        font,
        size,
        align,
        color,
        ..Default::default()
    })
}

fn hex(s: &str) -> Color {
    Color::parse(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_every_node_type() {
        let props = properties();
        for key in ["text", "image", "row", "column", "page", "headerFooter"] {
            assert!(props.get(key).is_some(), "missing {}", key);
        }
        assert_eq!(props["text"]["font"][1], "Helvetica-Bold");
        assert_eq!(props["page"]["page"], json!(["a4", "letter", "legal"]));
    }

    #[test]
    fn response_envelope() {
        let resp = properties_response();
        assert_eq!(resp["statusCode"], 200);
        assert_eq!(resp["data"], properties());
    }

    #[test]
    fn example_document_is_valid_and_round_trips() {
        let doc = example_document();
        doc.validate().unwrap();
        let json = serde_json::to_string(&doc).unwrap();
        let back: Document = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn catalog_matches_accepted_text_fields() {
        // Every catalogued text property must deserialize
        let node = json!({
            "type": "text", "content": "x", "font": "Helvetica", "size": 10,
            "align": "left", "color": "#000", "lineGap": 1, "width": 10,
            "height": 10, "backgroundColor": "#fff"
        });
        assert!(serde_json::from_value::<ContentNode>(node).is_ok());
    }
}
