use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{stmt::Value, Error};

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Self::DateTime(value.and_time(NaiveTime::MIN))
    }
}

impl TryFrom<Value> for NaiveDateTime {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::DateTime(value) => Ok(value),
            _ => Err(Error::type_conversion(&value, "NaiveDateTime")),
        }
    }
}

impl TryFrom<Value> for NaiveDate {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::DateTime(value) => Ok(value.date()),
            _ => Err(Error::type_conversion(&value, "NaiveDate")),
        }
    }
}
