//! Form Parsing
//!
//! Raw input values turned into API requests before anything is sent.

use chrono::NaiveDate;

use super::models::{BookingRequest, DoctorProfileRequest};

/// Patient booking form as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub doctor_id: String,
    pub date: String,
    pub time_slot: String,
}

impl BookingForm {
    pub fn to_request(&self) -> Result<BookingRequest, String> {
        let doctor_id = self
            .doctor_id
            .trim()
            .parse::<i64>()
            .map_err(|_| "Please select a doctor".to_string())?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid date: {}", self.date.trim()))?;
        let time_slot = self.time_slot.trim();
        if time_slot.is_empty() {
            return Err("Please choose a time slot".to_string());
        }
        Ok(BookingRequest {
            doctor_id,
            date,
            time_slot: time_slot.to_string(),
        })
    }
}

/// Doctor profile creation form as typed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorProfileForm {
    pub specialization: String,
    pub experience: String,
    pub fees: String,
}

impl DoctorProfileForm {
    pub fn to_request(&self) -> Result<DoctorProfileRequest, String> {
        let experience = self
            .experience
            .trim()
            .parse::<i64>()
            .map_err(|_| "Experience must be a whole number of years".to_string())?;
        let fees = self
            .fees
            .trim()
            .parse::<f64>()
            .map_err(|_| "Fees must be a number".to_string())?;
        Ok(DoctorProfileRequest {
            specialization: self.specialization.trim().to_string(),
            experience,
            fees,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_form() {
        let mut form = BookingForm {
            doctor_id: "7".to_string(),
            date: "2025-05-20".to_string(),
            time_slot: " 10:30 AM ".to_string(),
        };
        let req = form.to_request().unwrap();
        assert_eq!(req.doctor_id, 7);
        assert_eq!(req.time_slot, "10:30 AM");

        form.doctor_id.clear();
        assert_eq!(form.to_request().unwrap_err(), "Please select a doctor");

        form.doctor_id = "7".to_string();
        form.date = "20/05/2025".to_string();
        assert_eq!(form.to_request().unwrap_err(), "Invalid date: 20/05/2025");
    }

    #[test]
    fn test_doctor_profile_form() {
        let form = DoctorProfileForm {
            specialization: " Dermatology ".to_string(),
            experience: "9".to_string(),
            fees: "650.5".to_string(),
        };
        assert_eq!(
            form.to_request().unwrap(),
            DoctorProfileRequest {
                specialization: "Dermatology".to_string(),
                experience: 9,
                fees: 650.5,
            }
        );

        let bad = DoctorProfileForm {
            experience: "nine".to_string(),
            ..form
        };
        assert!(bad.to_request().is_err());
    }
}
