// ePOS-Print XML builder
//
// Emits the same element forms as the vendor's JavaScript builder so the
// printer firmware sees identical documents.

use crate::raster::MonoImage;

const EPOS_PRINT_NS: &str = "http://www.epson-pos.com/schemas/2011/03/epos-print";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    A,
    B,
    C,
}

impl Font {
    fn as_str(self) -> &'static str {
        match self {
            Font::A => "font_a",
            Font::B => "font_b",
            Font::C => "font_c",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    None,
    Color1,
    Color2,
}

impl Color {
    fn as_str(self) -> &'static str {
        match self {
            Color::None => "none",
            Color::Color1 => "color_1",
            Color::Color2 => "color_2",
        }
    }
}

/// QR error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrLevel {
    L,
    M,
    Q,
    H,
}

impl QrLevel {
    fn as_str(self) -> &'static str {
        match self {
            QrLevel::L => "level_l",
            QrLevel::M => "level_m",
            QrLevel::Q => "level_q",
            QrLevel::H => "level_h",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cut {
    NoFeed,
    Feed,
}

impl Cut {
    fn as_str(self) -> &'static str {
        match self {
            Cut::NoFeed => "no_feed",
            Cut::Feed => "feed",
        }
    }
}

/// Accumulates print commands into an `<epos-print>` document
#[derive(Debug, Default, Clone)]
pub struct EposBuilder {
    body: String,
}

impl EposBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text_align(&mut self, align: Align) -> &mut Self {
        self.body
            .push_str(&format!(r#"<text align="{}"/>"#, align.as_str()));
        self
    }

    pub fn add_text_font(&mut self, font: Font) -> &mut Self {
        self.body
            .push_str(&format!(r#"<text font="{}"/>"#, font.as_str()));
        self
    }

    /// Character magnification, each clamped to 1..=8
    pub fn add_text_size(&mut self, width: u8, height: u8) -> &mut Self {
        self.body.push_str(&format!(
            r#"<text width="{}" height="{}"/>"#,
            width.clamp(1, 8),
            height.clamp(1, 8)
        ));
        self
    }

    pub fn add_text_style(
        &mut self,
        reverse: bool,
        underline: bool,
        emphasis: bool,
        color: Color,
    ) -> &mut Self {
        self.body.push_str(&format!(
            r#"<text reverse="{}" ul="{}" em="{}" color="{}"/>"#,
            reverse,
            underline,
            emphasis,
            color.as_str()
        ));
        self
    }

    pub fn add_text(&mut self, text: &str) -> &mut Self {
        self.body
            .push_str(&format!("<text>{}</text>", escape_markup(text)));
        self
    }

    /// QR code (model 2). `size` 0 lets the printer choose.
    pub fn add_qr_code(
        &mut self,
        data: &str,
        level: QrLevel,
        width: u8,
        height: u8,
        size: u16,
    ) -> &mut Self {
        self.body.push_str(&format!(
            r#"<symbol type="qrcode_model_2" level="{}" width="{}" height="{}" size="{}">{}</symbol>"#,
            level.as_str(),
            width,
            height,
            size,
            escape_markup(data)
        ));
        self
    }

    /// 1 bpp raster image
    pub fn add_image(&mut self, image: &MonoImage) -> &mut Self {
        self.body.push_str(&format!(
            r#"<image width="{}" height="{}" color="color_1" mode="mono">{}</image>"#,
            image.width(),
            image.height(),
            image.to_base64()
        ));
        self
    }

    pub fn add_feed_line(&mut self, lines: u8) -> &mut Self {
        self.body
            .push_str(&format!(r#"<feed line="{}"/>"#, lines));
        self
    }

    pub fn add_cut(&mut self, cut: Cut) -> &mut Self {
        self.body
            .push_str(&format!(r#"<cut type="{}"/>"#, cut.as_str()));
        self
    }

    /// Complete `<epos-print>` document
    pub fn to_xml(&self) -> String {
        format!(r#"<epos-print xmlns="{}">{}</epos-print>"#, EPOS_PRINT_NS, self.body)
    }
}

/// Escape text content. Control characters become numeric references.
pub(crate) fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#9;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            c => out.push(c),
        }
    }
    out
}
