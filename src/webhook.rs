//! Admission webhook for NetworkPolicies.
//!
//! `POST /networkpolicies` takes an `AdmissionReview` and answers with the
//! verdict of the current [`AdmissionValidator`]. The validator is read from a
//! watch channel on each request, so a reload is a swap of the `Arc` in the
//! channel.

use axum::{Json, Router, extract::State, routing::post};
use axum_server::tls_rustls::RustlsConfig;
use k8s_openapi::api::networking::v1::NetworkPolicy;
use kube::core::{
    DynamicObject, GroupVersionResource,
    admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation},
};
use log::{debug, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::watch;

use crate::AdmissionValidator;

pub type Validator = watch::Receiver<Arc<AdmissionValidator>>;

type Review = AdmissionReview<DynamicObject>;
type Request = AdmissionRequest<DynamicObject>;

/// (group, version, resource) of the NetworkPolicy resources we can decode.
const RESOURCES: &[(&str, &str, &str)] = &[
    ("networking.k8s.io", "v1", "networkpolicies"),
    ("extensions", "v1beta1", "networkpolicies"),
];

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("expect resource to be networkpolicies, got {0}")]
    Resource(String),
    #[error("admission request missing object")]
    MissingObject,
    #[error("invalid NetworkPolicy spec: {0}")]
    Spec(#[from] serde_json::Error),
}

pub fn router(validator: Validator) -> Router {
    Router::new()
        .route("/networkpolicies", post(admit_networkpolicies))
        .with_state(validator)
}

/// Serve the webhook, with TLS if configured.
pub async fn serve(
    addr: SocketAddr,
    tls: Option<RustlsConfig>,
    validator: Validator,
) -> std::io::Result<()> {
    let app = router(validator).into_make_service();
    match tls {
        Some(tls) => {
            info!("listening on https://{addr}");
            axum_server::bind_rustls(addr, tls).serve(app).await
        }
        None => {
            info!("listening on http://{addr}");
            axum_server::bind(addr).serve(app).await
        }
    }
}

async fn admit_networkpolicies(
    State(validator): State<Validator>,
    Json(review): Json<Review>,
) -> Json<Review> {
    let req: Request = match review.try_into() {
        Ok(req) => req,
        Err(e) => {
            warn!("invalid admission review: {e}");
            return Json(AdmissionResponse::invalid(e).into_review());
        }
    };

    let validator = validator.borrow().clone();
    Json(admit(&validator, &req).into_review())
}

/// Decide on one admission request. The response keeps the request's uid.
pub fn admit(validator: &AdmissionValidator, req: &Request) -> AdmissionResponse {
    let rsp = AdmissionResponse::from(req);
    let uid = req.uid.as_str();

    if req.operation == Operation::Delete {
        debug!("{uid}: allowed delete");
        return rsp;
    }

    let policy = match decode(req) {
        Ok(v) => v,
        Err(e) => {
            warn!("{uid}: decode failed: {e}");
            return rsp.deny(e);
        }
    };

    let ns = policy.metadata.namespace.as_deref().unwrap_or_default();
    let name = policy.metadata.name.as_deref().unwrap_or(&req.name);

    match validator.is_valid(&policy) {
        Ok(()) => {
            debug!("{uid}: allowed {ns}/{name}");
            rsp
        }
        Err(reason) => {
            info!("{uid}: denied {ns}/{name}: {reason}");
            rsp.deny(reason.to_string().trim())
        }
    }
}

fn is_network_policy(gvr: &GroupVersionResource) -> bool {
    RESOURCES
        .iter()
        .any(|(g, v, r)| gvr.group == *g && gvr.version == *v && gvr.resource == *r)
}

/// Extract the NetworkPolicy from the request's raw object.
pub fn decode(req: &Request) -> Result<NetworkPolicy, DecodeError> {
    let gvr = &req.resource;
    if !is_network_policy(gvr) {
        let got = format!("{}/{}/{}", gvr.group, gvr.version, gvr.resource);
        return Err(DecodeError::Resource(got));
    }

    let obj = req.object.as_ref().ok_or(DecodeError::MissingObject)?;

    // only `spec` is read: the apiVersion may be the legacy one
    let spec = match obj.data.get("spec") {
        None => None,
        Some(spec) => Some(serde_json::from_value(spec.clone())?),
    };

    let mut metadata = obj.metadata.clone();
    if metadata.namespace.is_none() {
        metadata.namespace = req.namespace.clone();
    }

    Ok(NetworkPolicy {
        metadata,
        spec,
        ..Default::default()
    })
}
