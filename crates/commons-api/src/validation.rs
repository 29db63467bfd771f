//! Turns loosely-typed request bodies into the typed drafts the store accepts.
//!
//! Every violation in a body is collected, so a client sees all of its
//! mistakes in one 400 response.

use std::ops::RangeInclusive;

use axum::{Json, extract::rejection::JsonRejection};

use commons_types::api::{
    CreateHelpRequestRequest, CreateItemRequest, CreateRideRequest, FieldError,
};
use commons_types::{NewHelpRequest, NewItem, NewRide};

use crate::error::ApiError;

pub const MAX_SEATS: u8 = 8;

#[derive(Default)]
struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn required(&mut self, field: &str, value: Option<String>) -> String {
        value.unwrap_or_else(|| {
            self.reject(field, "Required");
            String::new()
        })
    }

    fn bounded<T>(&mut self, field: &str, value: Option<i64>, range: RangeInclusive<T>) -> T
    where
        T: TryFrom<i64> + PartialOrd + Default + std::fmt::Display,
    {
        let Some(raw) = value else {
            self.reject(field, "Required");
            return T::default();
        };

        match T::try_from(raw) {
            Ok(n) if range.contains(&n) => n,
            _ => {
                self.reject(
                    field,
                    format!("Must be between {} and {}", range.start(), range.end()),
                );
                T::default()
            }
        }
    }

    fn finish(self, message: &'static str) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Invalid {
                message,
                errors: self.errors,
            })
        }
    }
}

/// Unwrap a JSON body, reporting decode failures in the same shape as
/// validation failures.
pub fn json_body<T>(
    payload: Result<Json<T>, JsonRejection>,
    message: &'static str,
) -> Result<T, ApiError> {
    payload.map(|Json(body)| body).map_err(|rejection| ApiError::Invalid {
        message,
        errors: vec![FieldError {
            field: "body".to_string(),
            message: rejection.body_text(),
        }],
    })
}

pub const INVALID_RIDE: &str = "Invalid ride data";
pub const INVALID_ITEM: &str = "Invalid item data";
pub const INVALID_HELP_REQUEST: &str = "Invalid help request data";

pub fn ride_draft(req: CreateRideRequest) -> Result<NewRide, ApiError> {
    let mut check = Checker::default();
    let draft = NewRide {
        from_location: check.required("fromLocation", req.from_location),
        to_location: check.required("toLocation", req.to_location),
        date: check.required("date", req.date),
        time: check.required("time", req.time),
        total_seats: check.bounded("totalSeats", req.total_seats, 1..=MAX_SEATS),
        cost_per_person: check.bounded("costPerPerson", req.cost_per_person, 1..=u32::MAX),
        vehicle_info: check.required("vehicleInfo", req.vehicle_info),
    };
    check.finish(INVALID_RIDE)?;
    Ok(draft)
}

pub fn item_draft(req: CreateItemRequest) -> Result<NewItem, ApiError> {
    let mut check = Checker::default();
    let draft = NewItem {
        name: check.required("name", req.name),
        category: check.required("category", req.category),
        condition: check.required("condition", req.condition),
        description: check.required("description", req.description),
        image_url: req.image_url,
    };
    check.finish(INVALID_ITEM)?;
    Ok(draft)
}

pub fn help_request_draft(req: CreateHelpRequestRequest) -> Result<NewHelpRequest, ApiError> {
    let mut check = Checker::default();
    let draft = NewHelpRequest {
        title: check.required("title", req.title),
        category: check.required("category", req.category),
        description: check.required("description", req.description),
        location: check.required("location", req.location),
        urgency: check.required("urgency", req.urgency),
    };
    check.finish(INVALID_HELP_REQUEST)?;
    Ok(draft)
}
