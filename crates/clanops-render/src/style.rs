use crate::layout::Rect;
use serde::{Deserialize, Serialize};
use svg::node::element::{Group, Line, Rectangle, Text};

/// Advance width of one glyph relative to the font size, for monospace faces.
const MONOSPACE_ADVANCE: f32 = 0.6;
const ELLIPSIS: char = '…';

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub background: String,
    pub title_gradient_start: String,
    pub title_gradient_end: String,
    pub accent: String,
    pub card_fill: String,
    pub card_border: String,
    pub glow: String,
    pub glow_opacity: f32,
    pub tile_fill: String,
    pub tile_border: String,
    pub text: String,
    pub label_chip: String,
    pub label_chip_opacity: f32,
    pub placeholder: String,
    pub footer_opacity: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#061C37".to_string(),
            title_gradient_start: "#7FC9E8".to_string(),
            title_gradient_end: "#FFFFFF".to_string(),
            accent: "#3FA9F5".to_string(),
            card_fill: "#0b2a44".to_string(),
            card_border: "#1e5fa3".to_string(),
            glow: "#3FA9F5".to_string(),
            glow_opacity: 0.2,
            tile_fill: "#0f3557".to_string(),
            tile_border: "#1e5fa3".to_string(),
            text: "#FFFFFF".to_string(),
            label_chip: "#000000".to_string(),
            label_chip_opacity: 0.55,
            placeholder: "#5d7a99".to_string(),
            footer_opacity: 0.7,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Middle => "middle",
            Self::End => "end",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shadow {
    pub color: String,
    pub opacity: f32,
    pub dx: f32,
    pub dy: f32,
}

/// Everything one text draw needs. Nothing is inherited from earlier draws.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub fill: String,
    pub opacity: f32,
    pub anchor: Anchor,
    pub shadow: Option<Shadow>,
}

impl TextStyle {
    pub fn new(font_family: &str, font_size: f32, fill: &str) -> Self {
        Self {
            font_family: font_family.to_string(),
            font_size,
            bold: false,
            fill: fill.to_string(),
            opacity: 1.0,
            anchor: Anchor::Start,
            shadow: None,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn shadow(mut self, color: &str, opacity: f32, offset: f32) -> Self {
        self.shadow = Some(Shadow {
            color: color.to_string(),
            opacity,
            dx: offset,
            dy: offset,
        });
        self
    }
}

fn text_element(content: &str, x: f32, y: f32, style: &TextStyle, fill: &str, opacity: f32) -> Text {
    Text::new(content.to_string())
        .set("x", x)
        .set("y", y)
        .set("font-family", style.font_family.as_str())
        .set("font-size", style.font_size)
        .set("font-weight", if style.bold { "bold" } else { "normal" })
        .set("text-anchor", style.anchor.as_str())
        .set("fill", fill)
        .set("fill-opacity", opacity)
}

/// A text run with its optional shadow copy drawn first.
pub fn styled_text(content: &str, x: f32, y: f32, style: &TextStyle) -> Group {
    let content = sanitize(content);
    let mut group = Group::new();
    if let Some(shadow) = &style.shadow {
        group = group.add(text_element(
            &content,
            x + shadow.dx,
            y + shadow.dy,
            style,
            &shadow.color,
            shadow.opacity,
        ));
    }
    group.add(text_element(&content, x, y, style, &style.fill, style.opacity))
}

/// Same as [`styled_text`] with a paint-server reference (e.g. a gradient) as fill.
pub fn styled_text_with_fill(content: &str, x: f32, y: f32, style: &TextStyle, paint: &str) -> Group {
    let mut style = style.clone();
    style.fill = paint.to_string();
    styled_text(content, x, y, &style)
}

fn sanitize(content: &str) -> String {
    content.trim().chars().filter(|c| !c.is_control()).collect()
}

pub fn rounded_rect(rect: &Rect, radius: f32) -> Rectangle {
    Rectangle::new()
        .set("x", rect.x)
        .set("y", rect.y)
        .set("width", rect.width)
        .set("height", rect.height)
        .set("rx", radius)
        .set("ry", radius)
}

pub fn filled_rect(rect: &Rect, radius: f32, fill: &str, opacity: f32) -> Rectangle {
    rounded_rect(rect, radius)
        .set("fill", fill)
        .set("fill-opacity", opacity)
        .set("stroke", "none")
}

pub fn stroked_rect(rect: &Rect, radius: f32, stroke: &str, width: f32) -> Rectangle {
    rounded_rect(rect, radius)
        .set("fill", "none")
        .set("stroke", stroke)
        .set("stroke-width", width)
}

pub fn rule(x1: f32, y: f32, x2: f32, stroke: &str, width: f32) -> Line {
    Line::new()
        .set("x1", x1)
        .set("y1", y)
        .set("x2", x2)
        .set("y2", y)
        .set("stroke", stroke)
        .set("stroke-width", width)
        .set("stroke-linecap", "round")
}

pub fn measure_text(text: &str, font_size: f32) -> f32 {
    text.chars().count() as f32 * font_size * MONOSPACE_ADVANCE
}

/// Shortens `text` one character at a time until it, plus an ellipsis, fits
/// in `budget` pixels. Text that already fits is returned unchanged.
pub fn truncate_label(text: &str, budget: f32, font_size: f32) -> String {
    let text = text.trim();
    if measure_text(text, font_size) <= budget {
        return text.to_string();
    }
    let mut chars = text.chars().collect::<Vec<_>>();
    while !chars.is_empty() {
        chars.pop();
        let candidate = chars.iter().collect::<String>() + &ELLIPSIS.to_string();
        if measure_text(&candidate, font_size) <= budget {
            return candidate;
        }
    }
    ELLIPSIS.to_string()
}
