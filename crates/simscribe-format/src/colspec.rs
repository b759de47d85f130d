//! ---
//! ssc_section: "02-format-engine"
//! ssc_subsection: "module"
//! ssc_type: "source"
//! ssc_scope: "code"
//! ssc_description: "Columnar rendering engine for SimScribe log events."
//! ssc_version: "v0.1.0"
//! ssc_owner: "tbd"
//! ---
//! The column template compiler.
//!
//! Templates use brace placeholders with an explicit format specifier, e.g.
//! `{simtime:>14s}` or `{filename:>20}:{lineno:<4}`. Parsing happens once at
//! formatter construction; rendering walks the compiled segments against an
//! event field lookup.

use simscribe_common::FieldValue;

use crate::{FormatterError, Result};

/// Horizontal alignment inside a padded field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    /// `<` — flush left.
    Left,
    /// `>` — flush right.
    Right,
    /// `^` — centered, extra fill on the right.
    Center,
    /// `=` — fill between the sign and the digits of a numeric value.
    Numeric,
}

/// Sign rendering policy for numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignPolicy {
    /// `+` — sign both positive and negative values.
    Always,
    /// `-` — sign negative values only.
    NegativeOnly,
    /// ` ` — leading space for positive values.
    Space,
}

/// Parsed placeholder specifier, the text after `:` in a placeholder.
///
/// Grammar: `[[fill]align][sign][#][0][width][,][.precision][type]` with
/// type one of `bcdeEfFgGnosxX%`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatSpec {
    /// Fill character, meaningful together with an alignment.
    pub fill: Option<char>,
    /// Alignment; defaults to right for numbers and left for text.
    pub align: Option<Align>,
    /// Sign policy; defaults to negative-only.
    pub sign: Option<SignPolicy>,
    /// `#` — alternate form (radix prefixes for `b`/`o`/`x`/`X`).
    pub alternate: bool,
    /// `0` — zero-fill shorthand for numeric fields.
    pub zero_fill: bool,
    /// Minimum rendered width of the field.
    pub width: Option<usize>,
    /// `,` — thousands grouping for decimal renderings.
    pub grouping: bool,
    /// Digits after the decimal point (or maximum length for text).
    pub precision: Option<usize>,
    /// Presentation type character.
    pub kind: Option<char>,
}

impl FormatSpec {
    /// Parse a specifier string such as `>14s`, `06.2f` or `-^30`.
    pub fn parse(spec: &str) -> Result<Self> {
        let chars: Vec<char> = spec.chars().collect();
        let mut parsed = FormatSpec::default();
        let mut at = 0usize;

        let is_align = |c: char| matches!(c, '<' | '>' | '^' | '=');
        if chars.len() >= 2 && is_align(chars[1]) {
            parsed.fill = Some(chars[0]);
            parsed.align = Some(align_for(chars[1]));
            at = 2;
        } else if !chars.is_empty() && is_align(chars[0]) {
            parsed.align = Some(align_for(chars[0]));
            at = 1;
        }

        if at < chars.len() {
            parsed.sign = match chars[at] {
                '+' => Some(SignPolicy::Always),
                '-' => Some(SignPolicy::NegativeOnly),
                ' ' => Some(SignPolicy::Space),
                _ => None,
            };
            if parsed.sign.is_some() {
                at += 1;
            }
        }

        if at < chars.len() && chars[at] == '#' {
            parsed.alternate = true;
            at += 1;
        }

        if at < chars.len() && chars[at] == '0' {
            parsed.zero_fill = true;
            at += 1;
        }

        let width_start = at;
        while at < chars.len() && chars[at].is_ascii_digit() {
            at += 1;
        }
        if at > width_start {
            let digits: String = chars[width_start..at].iter().collect();
            parsed.width = digits.parse().ok();
        }

        if at < chars.len() && chars[at] == ',' {
            parsed.grouping = true;
            at += 1;
        }

        if at < chars.len() && chars[at] == '.' {
            at += 1;
            let precision_start = at;
            while at < chars.len() && chars[at].is_ascii_digit() {
                at += 1;
            }
            if at == precision_start {
                return Err(FormatterError::Configuration(format!(
                    "unable to parse the format specifier {:?}",
                    spec
                )));
            }
            let digits: String = chars[precision_start..at].iter().collect();
            parsed.precision = digits.parse().ok();
        }

        if at < chars.len() {
            let c = chars[at];
            if "bcdeEfFgGnosxX%".contains(c) {
                parsed.kind = Some(c);
                at += 1;
            }
        }

        if at != chars.len() {
            return Err(FormatterError::Configuration(format!(
                "unable to parse the format specifier {:?}",
                spec
            )));
        }

        Ok(parsed)
    }

    /// Render a value through this specifier.
    pub fn render(&self, value: &FieldValue) -> String {
        match value {
            FieldValue::Str(s) => self.render_str(s),
            FieldValue::Int(i) => self.render_int(*i),
            FieldValue::Float(f) => self.render_float(*f),
        }
    }

    fn render_str(&self, s: &str) -> String {
        let body: String = match self.precision {
            Some(limit) => s.chars().take(limit).collect(),
            None => s.to_owned(),
        };
        self.pad(String::new(), body, false)
    }

    fn render_int(&self, v: i64) -> String {
        match self.kind {
            Some('e' | 'E' | 'f' | 'F' | 'g' | 'G' | '%') => self.render_float(v as f64),
            Some('c') => {
                let body = u32::try_from(v)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .unwrap_or_else(|| v.to_string());
                self.pad(String::new(), body, false)
            }
            kind => {
                let magnitude = v.unsigned_abs();
                let mut digits = match kind {
                    Some('b') => format!("{:b}", magnitude),
                    Some('o') => format!("{:o}", magnitude),
                    Some('x') => format!("{:x}", magnitude),
                    Some('X') => format!("{:X}", magnitude),
                    _ => magnitude.to_string(),
                };
                if self.grouping && matches!(kind, None | Some('d' | 'n')) {
                    digits = group_thousands(&digits);
                }
                let mut prefix = self.sign_prefix(v < 0);
                if self.alternate {
                    match kind {
                        Some('b') => prefix.push_str("0b"),
                        Some('o') => prefix.push_str("0o"),
                        Some('x') => prefix.push_str("0x"),
                        Some('X') => prefix.push_str("0X"),
                        _ => {}
                    }
                }
                self.pad(prefix, digits, true)
            }
        }
    }

    fn render_float(&self, v: f64) -> String {
        let negative = v.is_sign_negative() && !v.is_nan();
        let magnitude = v.abs();
        let mut body = match self.kind {
            Some('f' | 'F') => format!("{:.p$}", magnitude, p = self.precision.unwrap_or(6)),
            Some('e') => exp_notation(magnitude, self.precision.unwrap_or(6), false),
            Some('E') => exp_notation(magnitude, self.precision.unwrap_or(6), true),
            Some('g') => general_notation(magnitude, self.precision.unwrap_or(6).max(1), false),
            Some('G') => general_notation(magnitude, self.precision.unwrap_or(6).max(1), true),
            Some('%') => format!(
                "{:.p$}%",
                magnitude * 100.0,
                p = self.precision.unwrap_or(6)
            ),
            _ => match self.precision {
                Some(p) => format!("{:.p$}", magnitude, p = p),
                None => format!("{}", magnitude),
            },
        };
        if self.grouping && matches!(self.kind, Some('f' | 'F')) {
            body = group_float(&body);
        }
        self.pad(self.sign_prefix(negative), body, true)
    }

    fn sign_prefix(&self, negative: bool) -> String {
        if negative {
            "-".to_owned()
        } else {
            match self.sign {
                Some(SignPolicy::Always) => "+".to_owned(),
                Some(SignPolicy::Space) => " ".to_owned(),
                _ => String::new(),
            }
        }
    }

    /// Apply fill, alignment and minimum width around a rendered body.
    fn pad(&self, prefix: String, body: String, numeric: bool) -> String {
        let width = self.width.unwrap_or(0);
        let content = prefix.chars().count() + body.chars().count();
        if width <= content {
            return prefix + &body;
        }
        let padding = width - content;

        let (fill, align) = if let Some(align) = self.align {
            (self.fill.unwrap_or(' '), align)
        } else if self.zero_fill && numeric {
            ('0', Align::Numeric)
        } else if numeric {
            (' ', Align::Right)
        } else {
            (' ', Align::Left)
        };
        let run = |n: usize| std::iter::repeat(fill).take(n).collect::<String>();

        match align {
            Align::Left => format!("{}{}{}", prefix, body, run(padding)),
            Align::Right => format!("{}{}{}", run(padding), prefix, body),
            Align::Numeric => format!("{}{}{}", prefix, run(padding), body),
            Align::Center => {
                let left = padding / 2;
                format!("{}{}{}{}", run(left), prefix, body, run(padding - left))
            }
        }
    }
}

fn align_for(c: char) -> Align {
    match c {
        '<' => Align::Left,
        '>' => Align::Right,
        '^' => Align::Center,
        _ => Align::Numeric,
    }
}

/// Insert thousands separators into a plain digit run.
fn group_thousands(digits: &str) -> String {
    let len = digits.chars().count();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

/// Group the integer part of an already-rendered fixed-point number.
fn group_float(body: &str) -> String {
    match body.split_once('.') {
        Some((int_part, frac)) => format!("{}.{}", group_thousands(int_part), frac),
        None => group_thousands(body),
    }
}

/// Scientific notation with a signed two-digit exponent.
fn exp_notation(v: f64, precision: usize, upper: bool) -> String {
    let (mantissa, exponent) = if v == 0.0 {
        (0.0, 0i32)
    } else {
        let mut exponent = v.log10().floor() as i32;
        let mut mantissa = v / 10f64.powi(exponent);
        // rounding at the requested precision can carry into the next decade
        if format!("{:.p$}", mantissa, p = precision).starts_with("10") {
            exponent += 1;
            mantissa = v / 10f64.powi(exponent);
        }
        (mantissa, exponent)
    };
    let marker = if upper { 'E' } else { 'e' };
    let sign = if exponent < 0 { '-' } else { '+' };
    format!(
        "{:.p$}{}{}{:02}",
        mantissa,
        marker,
        sign,
        exponent.abs(),
        p = precision
    )
}

/// General notation: fixed for moderate exponents, scientific otherwise,
/// trailing zeros stripped.
fn general_notation(v: f64, precision: usize, upper: bool) -> String {
    if v == 0.0 {
        return "0".to_owned();
    }
    let exponent = v.log10().floor() as i32;
    if exponent < -4 || exponent >= precision as i32 {
        let rendered = exp_notation(v, precision.saturating_sub(1), upper);
        let marker = if upper { 'E' } else { 'e' };
        match rendered.split_once(marker) {
            Some((mantissa, exp)) => {
                let mantissa = if mantissa.contains('.') {
                    mantissa.trim_end_matches('0').trim_end_matches('.')
                } else {
                    mantissa
                };
                format!("{}{}{}", mantissa, marker, exp)
            }
            None => rendered,
        }
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        let rendered = format!("{:.d$}", v, d = decimals);
        if rendered.contains('.') {
            rendered
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_owned()
        } else {
            rendered
        }
    }
}

/// One parsed run of a template.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Literal text copied through verbatim.
    Literal(String),
    /// Placeholder rendered from an event field.
    Field {
        /// Field name; empty for positional placeholders.
        name: String,
        /// Parsed specifier.
        spec: FormatSpec,
    },
}

/// Walk a template into literal and placeholder runs.
///
/// `{{` and `}}` escape to literal braces; conversion markers (`!r` style)
/// are rejected rather than silently ignored.
pub(crate) fn parse_segments(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut placeholder = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == '}' {
                        closed = true;
                        break;
                    }
                    placeholder.push(inner);
                }
                if !closed {
                    return Err(FormatterError::Configuration(format!(
                        "unterminated placeholder in template {:?}",
                        template
                    )));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                let (name, spec) = match placeholder.split_once(':') {
                    Some((name, spec)) => (name, FormatSpec::parse(spec)?),
                    None => (placeholder.as_str(), FormatSpec::default()),
                };
                if name.contains('!') {
                    return Err(FormatterError::Configuration(format!(
                        "conversion markers are not supported in placeholder {:?}",
                        placeholder
                    )));
                }
                segments.push(Segment::Field {
                    name: name.to_owned(),
                    spec,
                });
            }
            '}' => {
                return Err(FormatterError::Configuration(format!(
                    "single '}}' encountered in template {:?}",
                    template
                )));
            }
            other => literal.push(other),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// A compiled column template with a fixed total width.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    segments: Vec<Segment>,
    width: usize,
    pad: String,
}

impl ColumnSpec {
    /// Compile a column template, enforcing mandatory placeholder widths and
    /// the minimum total width of 2.
    pub fn parse(template: &str) -> Result<Self> {
        let segments = parse_segments(template)?;
        let mut width = 0usize;
        for segment in &segments {
            match segment {
                Segment::Literal(text) => width += text.chars().count(),
                Segment::Field { spec, .. } => match spec.width {
                    Some(w) => width += w,
                    None => {
                        return Err(FormatterError::Configuration(format!(
                            "width must be defined in the format specifier of {:?}",
                            template
                        )))
                    }
                },
            }
        }
        if width < 2 {
            return Err(FormatterError::Configuration(format!(
                "column width must be at least 2, got {} for {:?}",
                width, template
            )));
        }
        Ok(Self {
            segments,
            width,
            pad: " ".repeat(width),
        })
    }

    /// Total width the column occupies before truncation.
    pub fn width(&self) -> usize {
        self.width
    }

    /// All-blank stand-in of exactly the column width.
    pub fn pad(&self) -> &str {
        &self.pad
    }

    /// Compiled segments.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Render against a field lookup.
    ///
    /// Returns `None` when any referenced field is absent, leaving the
    /// substitution decision to the caller.
    pub fn render<F>(&self, lookup: F) -> Option<String>
    where
        F: Fn(&str) -> Option<FieldValue>,
    {
        let mut rendered = String::with_capacity(self.width);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Field { name, spec } => {
                    let value = lookup(name)?;
                    rendered.push_str(&spec.render(&value));
                }
            }
        }
        Some(rendered)
    }
}

/// A free-form template without the fixed-width constraints — the final
/// message region and the prefix.
#[derive(Debug, Clone)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Compile a free-form template.
    pub fn parse(template: &str) -> Result<Self> {
        Ok(Self {
            segments: parse_segments(template)?,
        })
    }

    /// Whether any placeholder references the named field.
    pub fn uses_field(&self, field: &str) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Field { name, .. } if name == field))
    }

    /// Render against a field lookup; absent fields render as the empty
    /// string.
    pub fn render<F>(&self, lookup: F) -> String
    where
        F: Fn(&str) -> Option<FieldValue>,
    {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Field { name, spec } => {
                    if let Some(value) = lookup(name) {
                        rendered.push_str(&spec.render(&value));
                    }
                }
            }
        }
        rendered
    }

    /// Render every placeholder with the one supplied value, as the
    /// sim-time path does.
    pub fn render_with(&self, value: &FieldValue) -> String {
        let mut rendered = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => rendered.push_str(text),
                Segment::Field { spec, .. } => rendered.push_str(&spec.render(value)),
            }
        }
        rendered
    }
}
