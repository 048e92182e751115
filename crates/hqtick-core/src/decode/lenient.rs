//! Parse-or-default numeric parsing.
//!
//! Provider payloads occasionally carry blank or garbled numeric fields. A
//! bad field becomes zero instead of rejecting the whole record, and the
//! `parsed` flag keeps that substitution visible to the caller.

/// A parsed value plus whether the text was actually a number.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lenient<T> {
    pub value: T,
    pub parsed: bool,
}

impl<T: Default> Lenient<T> {
    fn ok(value: T) -> Self {
        Self {
            value,
            parsed: true,
        }
    }

    fn defaulted() -> Self {
        Self {
            value: T::default(),
            parsed: false,
        }
    }
}

/// Finite float, or `0.0`.
pub fn lenient_f64(text: &str) -> Lenient<f64> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Lenient::ok(value),
        _ => Lenient::defaulted(),
    }
}

/// Non-negative integer, or `0`. Float text is truncated (`"1200.0"` -> 1200).
pub fn lenient_u64(text: &str) -> Lenient<u64> {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return Lenient::ok(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value < u64::MAX as f64 => {
            Lenient::ok(value.trunc() as u64)
        }
        _ => Lenient::defaulted(),
    }
}

/// Positional reader over split fields that counts zero-defaulted numbers.
#[derive(Debug)]
pub(crate) struct FieldReader<'a> {
    fields: &'a [&'a str],
    defaulted: u32,
}

impl<'a> FieldReader<'a> {
    pub(crate) fn new(fields: &'a [&'a str]) -> Self {
        Self {
            fields,
            defaulted: 0,
        }
    }

    pub(crate) fn text(&self, index: usize) -> String {
        self.fields
            .get(index)
            .map(|field| field.trim().to_owned())
            .unwrap_or_default()
    }

    pub(crate) fn f64(&mut self, index: usize) -> f64 {
        let parsed = lenient_f64(self.fields.get(index).copied().unwrap_or(""));
        self.track(parsed)
    }

    pub(crate) fn u64(&mut self, index: usize) -> u64 {
        let parsed = lenient_u64(self.fields.get(index).copied().unwrap_or(""));
        self.track(parsed)
    }

    pub(crate) const fn defaulted(&self) -> u32 {
        self.defaulted
    }

    fn track<T>(&mut self, parsed: Lenient<T>) -> T {
        if !parsed.parsed {
            self.defaulted = self.defaulted.saturating_add(1);
        }
        parsed.value
    }
}
