use k8s_openapi::api::networking::v1::IPBlock;

use crate::Rejection;
use crate::mask::mask_width;
use crate::rule::{RuleKind, RuleList, Target, len_subject};

/// Primary CIDR of an IP block.
pub enum Cidr {}

impl Target for Cidr {
    type Input = str;
    const NAME: &'static str = "cidr";
    const KINDS: &'static [RuleKind] = &[RuleKind::MaskBitsSize];

    fn measure<F>(cidr: &str, kind: RuleKind, mut check: F) -> Result<(), Rejection>
    where
        F: FnMut(i64) -> Result<(), Rejection>,
    {
        match kind {
            RuleKind::MaskBitsSize => check(mask_width(cidr)?.into()),
            _ => Ok(()),
        }
    }
}

/// Exception CIDRs of an IP block.
pub enum Except {}

impl Target for Except {
    type Input = [String];
    const NAME: &'static str = "except";
    const KINDS: &'static [RuleKind] = &[RuleKind::ListSize, RuleKind::MaskBitsSize];

    fn measure<F>(except: &[String], kind: RuleKind, mut check: F) -> Result<(), Rejection>
    where
        F: FnMut(i64) -> Result<(), Rejection>,
    {
        match kind {
            RuleKind::ListSize => check(len_subject(except.len())),
            RuleKind::MaskBitsSize => {
                for cidr in except {
                    check(mask_width(cidr)?.into())?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct CidrValidator {
    pub rules: RuleList<Cidr>,
}

impl CidrValidator {
    pub fn is_valid(&self, cidr: &str) -> Result<(), Rejection> {
        self.rules.check(cidr)
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExceptValidator {
    pub rules: RuleList<Except>,
}

impl ExceptValidator {
    pub fn is_valid(&self, except: &[String]) -> Result<(), Rejection> {
        self.rules.check(except)
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize)]
#[serde(default)]
pub struct IpBlockValidator {
    pub cidr: CidrValidator,
    pub except: ExceptValidator,
}

impl IpBlockValidator {
    pub fn is_valid(&self, block: &IPBlock) -> Result<(), Rejection> {
        self.cidr.is_valid(&block.cidr)?;
        self.except.is_valid(block.except.as_deref().unwrap_or_default())
    }
}
