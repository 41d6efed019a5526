//! Credential offer bodies for the degree schema.
//!
//! Offers are shaped for either the v1 (`/issue-credential/send-offer`) or
//! the v2 (`/issue-credential-2.0/send-offer`) issue-credential endpoint.

use std::collections::HashMap;

use chrono::{Datelike, Local, NaiveDate};
use serde_json::{Value, json};

use crate::error::AdminError;
use crate::protocol::{Aip, CRED_PREVIEW_TYPE, CredentialFormat, format_label};

/// Date layout used for `date` and `birthdate_dateint` values.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Wall-clock inputs to the payload builders.
#[derive(Debug, Clone, Copy)]
pub struct Moment {
    pub today: NaiveDate,
    pub unix_secs: i64,
}

impl Moment {
    pub fn now() -> Self {
        let now = Local::now();
        Self {
            today: now.date_naive(),
            unix_secs: now.timestamp(),
        }
    }
}

/// Operator input for a degree credential.
#[derive(Debug, Clone)]
pub struct DegreeInput {
    pub name: String,
    pub age: String,
    pub degree: String,
}

/// Everything about the current session an offer needs.
#[derive(Debug, Clone, Copy)]
pub struct OfferContext<'a> {
    pub aip: Aip,
    pub format: Option<CredentialFormat>,
    pub cred_def_id: &'a str,
    pub connection_id: Option<&'a str>,
    pub exchange_tracing: bool,
}

/// Attribute values last offered, keyed by credential definition id.
#[derive(Debug, Default)]
pub struct CredentialAttributes {
    by_cred_def: HashMap<String, Vec<(String, String)>>,
}

impl CredentialAttributes {
    pub fn get(&self, cred_def_id: &str) -> Option<&[(String, String)]> {
        self.by_cred_def.get(cred_def_id).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_cred_def.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_cred_def.is_empty()
    }

    fn insert(&mut self, cred_def_id: &str, attrs: Vec<(String, String)>) {
        self.by_cred_def.insert(cred_def_id.to_string(), attrs);
    }
}

/// `today` moved back by `years`, keeping month and day. A 29 February that
/// does not exist in the target year becomes 28 February.
pub fn years_before(today: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = today.year().checked_sub(years)?;
    NaiveDate::from_ymd_opt(year, today.month(), today.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, today.month(), 28))
}

/// Attribute values for a degree credential, in schema order.
pub fn degree_attributes(
    input: &DegreeInput,
    moment: Moment,
) -> Result<Vec<(String, String)>, AdminError> {
    let age: i32 = input
        .age
        .trim()
        .parse()
        .map_err(|_| AdminError::InvalidAge(input.age.clone()))?;
    let birth_date =
        years_before(moment.today, age).ok_or_else(|| AdminError::InvalidAge(input.age.clone()))?;

    Ok(vec![
        ("name".into(), input.name.clone()),
        ("date".into(), moment.today.format(DATE_FORMAT).to_string()),
        ("degree".into(), input.degree.clone()),
        (
            "birthdate_dateint".into(),
            birth_date.format(DATE_FORMAT).to_string(),
        ),
        ("timestamp".into(), moment.unix_secs.to_string()),
    ])
}

fn credential_preview(attrs: &[(String, String)]) -> Value {
    let attributes: Vec<Value> = attrs
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    json!({
        "@type": CRED_PREVIEW_TYPE,
        "attributes": attributes,
    })
}

/// Build the body of a credential offer and remember the offered attribute
/// values under `ctx.cred_def_id`.
pub fn generate_credential_offer(
    cache: &mut CredentialAttributes,
    ctx: &OfferContext<'_>,
    input: &DegreeInput,
    moment: Moment,
) -> Result<Value, AdminError> {
    let attrs = degree_attributes(input, moment)?;

    if ctx.aip == Aip::V20 && ctx.format != Some(CredentialFormat::Indy) {
        return Err(AdminError::InvalidCredentialType(format_label(ctx.format)));
    }

    let preview = credential_preview(&attrs);
    cache.insert(ctx.cred_def_id, attrs);
    let comment = format!("Offer on cred def id {}", ctx.cred_def_id);

    let offer = match ctx.aip {
        Aip::V10 => json!({
            "connection_id": ctx.connection_id,
            "cred_def_id": ctx.cred_def_id,
            "comment": comment,
            "auto_remove": false,
            "credential_preview": preview,
            "trace": ctx.exchange_tracing,
        }),
        Aip::V20 => json!({
            "connection_id": ctx.connection_id,
            "comment": comment,
            "auto_remove": false,
            "credential_preview": preview,
            "filter": { "indy": { "cred_def_id": ctx.cred_def_id } },
            "trace": ctx.exchange_tracing,
        }),
    };
    Ok(offer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moment() -> Moment {
        Moment {
            today: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
            unix_secs: 1_715_950_000,
        }
    }

    fn alice() -> DegreeInput {
        DegreeInput {
            name: "Alice Smith".into(),
            age: "25".into(),
            degree: "Maths".into(),
        }
    }

    fn ctx(aip: Aip, format: Option<CredentialFormat>) -> OfferContext<'static> {
        OfferContext {
            aip,
            format,
            cred_def_id: "WgWxqztrNooG92RXvxSTWv:3:CL:20:tag",
            connection_id: Some("conn-1"),
            exchange_tracing: false,
        }
    }

    #[test]
    fn test_years_before_plain_date() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
        assert_eq!(
            years_before(today, 18),
            NaiveDate::from_ymd_opt(2006, 5, 17)
        );
    }

    #[test]
    fn test_years_before_leap_day_falls_back() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            years_before(today, 1),
            NaiveDate::from_ymd_opt(2023, 2, 28)
        );
        assert_eq!(years_before(today, 4), Some(today.with_year(2020).unwrap()));
    }

    #[test]
    fn test_degree_attributes_in_schema_order() {
        let attrs = degree_attributes(&alice(), moment()).unwrap();
        let names: Vec<&str> = attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, crate::schema::DEGREE_SCHEMA_ATTRS);
        assert_eq!(attrs[1].1, "20240517");
        assert_eq!(attrs[3].1, "19990517");
        assert_eq!(attrs[4].1, "1715950000");
    }

    #[test]
    fn test_age_must_be_numeric() {
        let mut input = alice();
        input.age = "twenty".into();
        let err = degree_attributes(&input, moment()).unwrap_err();
        assert!(matches!(err, AdminError::InvalidAge(ref a) if a == "twenty"));
    }

    #[test]
    fn test_v10_offer_shape() {
        let mut cache = CredentialAttributes::default();
        let offer =
            generate_credential_offer(&mut cache, &ctx(Aip::V10, None), &alice(), moment()).unwrap();

        assert_eq!(offer["connection_id"], "conn-1");
        assert_eq!(offer["cred_def_id"], "WgWxqztrNooG92RXvxSTWv:3:CL:20:tag");
        assert_eq!(
            offer["comment"],
            "Offer on cred def id WgWxqztrNooG92RXvxSTWv:3:CL:20:tag"
        );
        assert_eq!(offer["auto_remove"], false);
        assert_eq!(offer["trace"], false);
        assert!(offer.get("filter").is_none());
        assert_eq!(offer["credential_preview"]["@type"], CRED_PREVIEW_TYPE);
        assert_eq!(
            offer["credential_preview"]["attributes"][0],
            json!({"name": "name", "value": "Alice Smith"})
        );
    }

    #[test]
    fn test_v20_indy_offer_uses_filter() {
        let mut cache = CredentialAttributes::default();
        let offer = generate_credential_offer(
            &mut cache,
            &ctx(Aip::V20, Some(CredentialFormat::Indy)),
            &alice(),
            moment(),
        )
        .unwrap();

        assert!(offer.get("cred_def_id").is_none());
        assert_eq!(
            offer["filter"],
            json!({"indy": {"cred_def_id": "WgWxqztrNooG92RXvxSTWv:3:CL:20:tag"}})
        );
        assert_eq!(
            offer["credential_preview"]["attributes"]
                .as_array()
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn test_v20_json_ld_offer_is_rejected() {
        let mut cache = CredentialAttributes::default();
        let err = generate_credential_offer(
            &mut cache,
            &ctx(Aip::V20, Some(CredentialFormat::JsonLd)),
            &alice(),
            moment(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Error invalid credential type: json-ld");
        assert!(cache.is_empty());
    }

    #[test]
    fn test_offer_remembers_latest_attributes() {
        let mut cache = CredentialAttributes::default();
        let c = ctx(Aip::V10, None);
        generate_credential_offer(&mut cache, &c, &alice(), moment()).unwrap();

        let mut bob = alice();
        bob.name = "Bob".into();
        generate_credential_offer(&mut cache, &c, &bob, moment()).unwrap();

        assert_eq!(cache.len(), 1);
        let attrs = cache.get(c.cred_def_id).unwrap();
        assert_eq!(attrs[0], ("name".to_string(), "Bob".to_string()));
    }
}
