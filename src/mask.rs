use cidr::IpInet;

use crate::Rejection;

/// Prefix length of an `address/prefix` block, IPv4 or IPv6.
///
/// Host bits may be set (`10.1.2.3/8`): only the prefix matters here, and the
/// API server accepts such blocks.
pub fn mask_width(cidr: &str) -> Result<u8, Rejection> {
    let malformed = |reason: String| Rejection::MalformedCidr {
        cidr: cidr.to_string(),
        reason,
    };

    // a bare address parses as a full-length block, but is not a CIDR
    if !cidr.contains('/') {
        return Err(malformed("missing prefix length".into()));
    }

    let inet: IpInet = cidr.parse().map_err(|e| malformed(format!("{e}")))?;
    Ok(inet.network_length())
}
