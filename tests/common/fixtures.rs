#![allow(dead_code)]

use docket::{BitmapHost, CaptureError, CaptureHost, CaptureOptions, Invoice, RegionRef};
use image::{Rgba, RgbaImage};
use serde_json::{Value, json};
use std::collections::VecDeque;

/// An invoice with a linked customer and the given items.
pub fn invoice_json(items: Vec<Value>) -> Value {
    json!({
        "id": 1042,
        "createdAt": "2024-03-05T14:30:00Z",
        "customer": {
            "name": "Jane Roe",
            "email": "jane@example.com",
            "phone": "+1 555 0100",
            "address": "1 Main Street"
        },
        "createdBy": { "name": "Sam Clerk", "email": "sam@shop.test" },
        "invoiceDetails": items
    })
}

pub fn item(name: &str, quantity: f64, unit_price: f64) -> Value {
    json!({ "quantity": quantity, "product": { "name": name, "unitPrice": unit_price } })
}

pub fn item_with_subtotal(name: &str, quantity: f64, unit_price: f64, subtotal: f64) -> Value {
    json!({
        "quantity": quantity,
        "subtotal": subtotal,
        "product": { "name": name, "unitPrice": unit_price }
    })
}

pub fn invoice(value: Value) -> Invoice {
    serde_json::from_value(value).expect("fixture invoice should deserialize")
}

/// `count` plain items named "Item 1".. "Item N".
pub fn many_items(count: usize) -> Vec<Value> {
    (1..=count).map(|i| item(&format!("Item {}", i), 1.0, 10.0)).collect()
}

/// A bitmap with a gradient so crops are distinguishable.
pub fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |_, y| {
        let v = (y % 256) as u8;
        Rgba([v, 255 - v, 128, 255])
    })
}

/// A [`BitmapHost`] that fails its first rasterizations with scripted errors.
pub struct ScriptedHost {
    pub inner: BitmapHost,
    pub failures: VecDeque<CaptureError>,
    pub rasterize_calls: usize,
}

impl ScriptedHost {
    pub fn new(id: &str, image: RgbaImage, failures: Vec<CaptureError>) -> Self {
        let mut inner = BitmapHost::new();
        inner.insert(id, image);
        Self {
            inner,
            failures: failures.into(),
            rasterize_calls: 0,
        }
    }
}

impl CaptureHost for ScriptedHost {
    type Node = usize;

    fn resolve(&self, region: &RegionRef<usize>) -> Option<usize> {
        self.inner.resolve(region)
    }

    fn children(&self, node: &usize) -> Vec<usize> {
        self.inner.children(node)
    }

    fn computed_style(&self, node: &usize, property: &str) -> Option<String> {
        self.inner.computed_style(node, property)
    }

    fn set_style(&mut self, node: &usize, property: &str, value: &str) {
        self.inner.set_style(node, property, value)
    }

    fn clone_offscreen(&mut self, node: &usize) -> Result<usize, CaptureError> {
        self.inner.clone_offscreen(node)
    }

    fn remove(&mut self, node: &usize) {
        self.inner.remove(node)
    }

    fn rasterize(
        &mut self,
        node: &usize,
        options: &CaptureOptions,
    ) -> Result<RgbaImage, CaptureError> {
        self.rasterize_calls += 1;
        match self.failures.pop_front() {
            Some(err) => Err(err),
            None => self.inner.rasterize(node, options),
        }
    }
}
