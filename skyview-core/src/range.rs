//! Min/max text fields bound to a render control's display range.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use log::{debug, trace};

use crate::format::{format_g, parse_float, FloatValidator};
use crate::render::RenderControl;
use crate::signal::Connection;

#[derive(Debug)]
struct RangeFields {
    min_text: String,
    max_text: String,
    precision: usize,
}

impl RangeFields {
    fn update(&mut self, dmin: f64, dmax: f64) {
        self.min_text = format_g(dmin, self.precision);
        self.max_text = format_g(dmax, self.precision);
    }
}

/// A pair of text fields showing a display range.
///
/// The fields follow the render control: every `display_range_changed`
/// notification rewrites both texts. Typed text is kept as-is until
/// [`commit`](Self::commit) parses it; unparsable text is dropped silently
/// and stays visible until the next notification overwrites it.
#[derive(Debug)]
pub struct RangeEditor {
    fields: Rc<RefCell<RangeFields>>,
    validator: FloatValidator,
    _range_changed: Connection,
}

impl RangeEditor {
    /// Fields pre-populated from `rc` and subscribed to its range changes.
    #[must_use]
    pub fn new(rc: &RenderControl, precision: usize) -> Self {
        let fields = Rc::new(RefCell::new(RangeFields {
            min_text: String::new(),
            max_text: String::new(),
            precision,
        }));
        let (dmin, dmax) = rc.display_range();
        fields.borrow_mut().update(dmin, dmax);

        let weak: Weak<RefCell<RangeFields>> = Rc::downgrade(&fields);
        let connection = rc.display_range_changed().connect(move |&(dmin, dmax)| {
            if let Some(fields) = weak.upgrade() {
                fields.borrow_mut().update(dmin, dmax);
            }
        });

        Self {
            fields,
            validator: FloatValidator,
            _range_changed: connection,
        }
    }

    #[must_use]
    pub fn min_text(&self) -> String {
        self.fields.borrow().min_text.clone()
    }

    #[must_use]
    pub fn max_text(&self) -> String {
        self.fields.borrow().max_text.clone()
    }

    /// Replace the min text as typed; refused if the validator rejects it.
    pub fn edit_min(&self, text: &str) -> bool {
        let accepted = self.validator.allows(text);
        if accepted {
            self.fields.borrow_mut().min_text = text.to_string();
        }
        accepted
    }

    /// Replace the max text as typed; refused if the validator rejects it.
    pub fn edit_max(&self, text: &str) -> bool {
        let accepted = self.validator.allows(text);
        if accepted {
            self.fields.borrow_mut().max_text = text.to_string();
        }
        accepted
    }

    /// Overwrite both fields with `(dmin, dmax)`.
    pub fn show_range(&self, dmin: f64, dmax: f64) {
        self.fields.borrow_mut().update(dmin, dmax);
    }

    /// Parse both fields and, if both are numbers, hand them to `rc`.
    ///
    /// Returns whether the range was forwarded.
    pub fn commit(&self, rc: &RenderControl) -> bool {
        let parsed = {
            let fields = self.fields.borrow();
            parse_float(&fields.min_text).zip(parse_float(&fields.max_text))
        };
        match parsed {
            Some((dmin, dmax)) => {
                debug!("range fields committed {dmin} .. {dmax}");
                rc.set_display_range(dmin, dmax);
                true
            }
            None => {
                trace!("ignoring unparsable range text");
                false
            }
        }
    }
}
