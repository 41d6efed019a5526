//! Proof request bodies asking a holder to prove their degree.

use chrono::Datelike;
use serde_json::{Map, Value, json};

use crate::error::AdminError;
use crate::offers::{Moment, years_before};
use crate::protocol::{Aip, CredentialFormat, SIG_TYPE_BLS, format_label};
use crate::schema::DEGREE_SCHEMA_NAME;

/// Minimum age proven through the `birthdate_dateint` predicate.
pub const PROOF_MIN_AGE: i32 = 18;

#[derive(Debug, Clone, Copy)]
pub struct ProofRequestOptions<'a> {
    pub aip: Aip,
    pub format: Option<CredentialFormat>,
    pub revocation: bool,
    pub exchange_tracing: bool,
    /// Also ask for an unrestricted, self-attested attribute.
    pub self_attested: bool,
    /// `None` builds a connectionless request.
    pub connection_id: Option<&'a str>,
}

fn degree_restriction() -> Value {
    json!([{ "schema_name": DEGREE_SCHEMA_NAME }])
}

/// The Indy proof request shared by both AIP levels.
fn indy_proof_request(
    opts: &ProofRequestOptions<'_>,
    moment: Moment,
) -> Result<Value, AdminError> {
    let mut req_attrs = vec![
        json!({ "name": "name", "restrictions": degree_restriction() }),
        json!({ "name": "date", "restrictions": degree_restriction() }),
    ];
    if opts.revocation {
        req_attrs.push(json!({
            "name": "degree",
            "restrictions": degree_restriction(),
            "non_revoked": { "to": moment.unix_secs - 1 },
        }));
    } else {
        req_attrs.push(json!({ "name": "degree", "restrictions": degree_restriction() }));
    }
    if opts.self_attested {
        req_attrs.push(json!({ "name": "self_attested_thing" }));
    }

    // Holder must be at least PROOF_MIN_AGE: born on or before this date
    let birth_date =
        years_before(moment.today, PROOF_MIN_AGE).ok_or(AdminError::DateOutOfRange {
            date: moment.today,
            years: PROOF_MIN_AGE,
        })?;
    let birth_dateint = i64::from(birth_date.year()) * 10_000
        + i64::from(birth_date.month()) * 100
        + i64::from(birth_date.day());
    let req_preds = vec![json!({
        "name": "birthdate_dateint",
        "p_type": "<=",
        "p_value": birth_dateint,
        "restrictions": degree_restriction(),
    })];

    let requested_attributes: Map<String, Value> = req_attrs
        .into_iter()
        .map(|attr| (format!("0_{}_uuid", attr["name"].as_str().unwrap_or_default()), attr))
        .collect();
    let requested_predicates: Map<String, Value> = req_preds
        .into_iter()
        .map(|pred| (format!("0_{}_GE_uuid", pred["name"].as_str().unwrap_or_default()), pred))
        .collect();

    let mut proof_request = json!({
        "name": "Proof of Education",
        "version": "1.0",
        "requested_attributes": requested_attributes,
        "requested_predicates": requested_predicates,
    });
    if opts.revocation {
        proof_request["non_revoked"] = json!({ "to": moment.unix_secs });
    }
    Ok(proof_request)
}

/// DIF presentation request for a BBS+ signed permanent-resident credential.
fn dif_presentation_request() -> Value {
    json!({
        "options": {
            "challenge": "3fa85f64-5717-4562-b3fc-2c963f66afa7",
            "domain": "4jt78h47fh47",
        },
        "presentation_definition": {
            "id": "32f54163-7166-48f1-93d8-ff217bdb0654",
            "format": { "ldp_vp": { "proof_type": [SIG_TYPE_BLS] } },
            "input_descriptors": [{
                "id": "citizenship_input_1",
                "name": "EU Driver's License",
                "schema": [
                    { "uri": "https://www.w3.org/2018/credentials#VerifiableCredential" },
                    { "uri": "https://w3id.org/citizenship#PermanentResident" },
                ],
                "constraints": {
                    "limit_disclosure": "required",
                    "is_holder": [{
                        "directive": "required",
                        "field_id": ["1f44d55f-f161-4938-a659-f8026467f126"],
                    }],
                    "fields": [
                        {
                            "id": "1f44d55f-f161-4938-a659-f8026467f126",
                            "path": ["$.credentialSubject.familyName"],
                            "purpose": "The claim must be from one of the specified person",
                            "filter": { "const": "SMITH" },
                        },
                        {
                            "path": ["$.credentialSubject.givenName"],
                            "purpose": "The claim must be from one of the specified person",
                        },
                    ],
                },
            }],
        },
    })
}

/// Build a proof request body for `/present-proof/send-request` (AIP 1.0)
/// or `/present-proof-2.0/send-request` (AIP 2.0).
pub fn generate_proof_request_web_request(
    opts: &ProofRequestOptions<'_>,
    moment: Moment,
) -> Result<Value, AdminError> {
    let mut request = match (opts.aip, opts.format) {
        (Aip::V10, _) => json!({
            "proof_request": indy_proof_request(opts, moment)?,
            "trace": opts.exchange_tracing,
        }),
        (Aip::V20, Some(CredentialFormat::Indy)) => json!({
            "presentation_request": { "indy": indy_proof_request(opts, moment)? },
            "trace": opts.exchange_tracing,
        }),
        (Aip::V20, Some(CredentialFormat::JsonLd)) => json!({
            "comment": "test proof request for json-ld",
            "presentation_request": { "dif": dif_presentation_request() },
        }),
        (Aip::V20, None) => {
            return Err(AdminError::InvalidCredentialType(format_label(opts.format)));
        }
    };

    if let Some(connection_id) = opts.connection_id {
        request["connection_id"] = json!(connection_id);
    }
    Ok(request)
}
