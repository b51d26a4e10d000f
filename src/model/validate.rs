//! Numeric invariants that serde's type checking cannot express.

use super::{ContentNode, Document, PageGeometry};
use crate::error::FolioError;

impl PageGeometry {
    /// Margins must be finite and non-negative and must leave a content
    /// area of positive width and height.
    pub fn validate(&self) -> Result<(), FolioError> {
        let m = &self.margins;
        for (name, v) in [
            ("top", m.top),
            ("bottom", m.bottom),
            ("left", m.left),
            ("right", m.right),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(FolioError::Validation(format!(
                    "margins.{} must be a non-negative number, got {}",
                    name, v
                )));
            }
        }

        let rect = self.content_rect();
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Err(FolioError::Validation(format!(
                "margins leave no content area ({:.2} x {:.2} pt)",
                rect.width, rect.height
            )));
        }
        Ok(())
    }
}

impl Document {
    /// Check every invariant of the model. Runs before layout; the engine
    /// assumes its input passed.
    pub fn validate(&self) -> Result<(), FolioError> {
        self.geometry.validate()?;
        validate_nodes(&self.header, "header")?;
        validate_nodes(&self.body, "content")?;
        validate_nodes(&self.footer, "footer")?;
        Ok(())
    }
}

fn validate_nodes(nodes: &[ContentNode], path: &str) -> Result<(), FolioError> {
    for (i, node) in nodes.iter().enumerate() {
        let here = format!("{}[{}]", path, i);
        validate_node(node, &here)?;
    }
    Ok(())
}

fn validate_node(node: &ContentNode, path: &str) -> Result<(), FolioError> {
    match node {
        ContentNode::Text(t) => {
            if !t.size.is_finite() || t.size <= 0.0 {
                return Err(invalid(path, "size", "a positive number", t.size));
            }
            if !t.line_gap.is_finite() || t.line_gap < 0.0 {
                return Err(invalid(path, "lineGap", "a non-negative number", t.line_gap));
            }
            check_dimension(path, "width", t.width)?;
            check_dimension(path, "height", t.height)?;
        }
        ContentNode::Image(img) => {
            check_dimension(path, "width", img.width)?;
            check_dimension(path, "height", img.height)?;
        }
        ContentNode::Row(c) | ContentNode::Column(c) => {
            check_dimension(path, "height", c.height)?;
            validate_nodes(&c.children, &format!("{}.childs", path))?;
        }
    }
    Ok(())
}

fn check_dimension(path: &str, field: &str, value: Option<f64>) -> Result<(), FolioError> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => {
            Err(invalid(path, field, "a non-negative number", v))
        }
        _ => Ok(()),
    }
}

fn invalid(path: &str, field: &str, expected: &str, got: f64) -> FolioError {
    FolioError::Validation(format!("{}.{} must be {}, got {}", path, field, expected, got))
}

#[cfg(test)]
mod tests {
    use crate::model::*;

    fn geometry(margins: Margins) -> PageGeometry {
        PageGeometry::new(PageSize::A4, Orientation::Portrait, margins)
    }

    #[test]
    fn default_geometry_is_valid() {
        assert!(PageGeometry::default().validate().is_ok());
    }

    #[test]
    fn negative_margin_rejected() {
        let mut m = Margins::uniform(1.0);
        m.left = -0.5;
        let err = geometry(m).validate().unwrap_err();
        assert!(err.to_string().contains("margins.left"));
    }

    #[test]
    fn margins_swallowing_page_rejected() {
        // A4 is ~8.27in wide
        let mut m = Margins::uniform(1.0);
        m.left = 4.5;
        m.right = 4.5;
        assert!(geometry(m).validate().is_err());
    }

    #[test]
    fn nested_bad_font_size_reports_path() {
        let doc = Document::new(
            PageGeometry::default(),
            vec![ContentNode::row(vec![
                ContentNode::text("ok", 12.0),
                ContentNode::text("bad", 0.0),
            ])],
        );
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("content[0].childs[1].size"), "{}", err);
    }

    #[test]
    fn negative_line_gap_rejected() {
        let doc = Document::new(
            PageGeometry::default(),
            vec![ContentNode::Text(TextNode {
                text: "x".into(),
                line_gap: -1.0,
                ..Default::default()
            })],
        );
        assert!(doc.validate().is_err());
    }

    #[test]
    fn negative_image_height_rejected_in_footer() {
        let doc = Document::new(PageGeometry::default(), vec![])
            .with_footer(vec![ContentNode::image("./x.png", Some(10.0), Some(-3.0))]);
        let err = doc.validate().unwrap_err();
        assert!(err.to_string().contains("footer[0].height"));
    }
}
