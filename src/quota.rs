use crate::models::quota::{NormalizedQuotaRecord, PercentUsed, RawQuotaRecord};
use crate::util::units::{bytes_to_gib, round2};

/// Convert one raw usage record to GiB and annotate it with percent used.
///
/// Never fails: absent or zero byte values become `0.0`, and a record with no
/// quota anywhere gets `PercentUsed::Unbounded`.
pub fn normalize(raw: &RawQuotaRecord, array_name: &str) -> NormalizedQuotaRecord {
    let default_quota_gib = bytes_to_gib(raw.file_system_default_quota_bytes);
    let user_quota_gib    = bytes_to_gib(raw.quota_bytes);
    let usage_gib         = bytes_to_gib(raw.usage_bytes);

    // Percent is tried against the user's own quota before the default is
    // substituted.
    let percent_used = percent_of(usage_gib, user_quota_gib)
        .or_else(|| percent_of(usage_gib, default_quota_gib))
        .map(PercentUsed::Ratio)
        .unwrap_or(PercentUsed::Unbounded);

    let effective_quota_gib = if user_quota_gib == 0.0 { default_quota_gib } else { user_quota_gib };

    NormalizedQuotaRecord {
        array_name:       array_name.to_string(),
        file_system_name: raw.file_system_name.clone(),
        default_quota_gib,
        user_name:        raw.user_name.clone(),
        user_id:          raw.user_id,
        effective_quota_gib,
        usage_gib,
        percent_used,
    }
}

fn percent_of(usage_gib: f64, quota_gib: f64) -> Option<f64> {
    if quota_gib == 0.0 { return None; }
    Some(round2(usage_gib / quota_gib * 100.0))
}

/// Keep only records belonging to `user` (exact, case-sensitive match).
/// With no user every record passes; source order is preserved.
pub fn filter_user<'a, I>(records: I, user: Option<&'a str>) -> impl Iterator<Item = NormalizedQuotaRecord> + 'a
where
    I: IntoIterator<Item = NormalizedQuotaRecord>,
    I::IntoIter: 'a,
{
    records
        .into_iter()
        .filter(move |rec| user.map_or(true, |u| rec.user_name == u))
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIB: u64 = 1_073_741_824;

    fn raw(default: Option<u64>, quota: Option<u64>, usage: Option<u64>) -> RawQuotaRecord {
        RawQuotaRecord {
            file_system_name:                "fs1".into(),
            file_system_default_quota_bytes: default,
            user_name:                       "alice".into(),
            user_id:                         1001,
            quota_bytes:                     quota,
            usage_bytes:                     usage,
        }
    }

    fn named(user: &str) -> NormalizedQuotaRecord {
        let mut r = raw(None, Some(GIB), Some(GIB / 2));
        r.user_name = user.into();
        normalize(&r, "fb1")
    }

    #[test]
    fn test_zero_quota_falls_back_to_default() {
        let n = normalize(&raw(Some(5 * GIB), Some(0), Some(GIB)), "fb1");
        assert_eq!(n.effective_quota_gib, 5.0);
        assert_eq!(n.default_quota_gib, 5.0);
    }

    #[test]
    fn test_explicit_quota_wins_over_default() {
        let n = normalize(&raw(Some(5 * GIB), Some(2 * GIB), Some(GIB)), "fb1");
        assert_eq!(n.effective_quota_gib, 2.0);
        assert_eq!(n.percent_used, PercentUsed::Ratio(50.0));
    }

    #[test]
    fn test_no_quota_anywhere_is_unbounded() {
        let n = normalize(&raw(None, None, Some(GIB)), "fb1");
        assert_eq!(n.effective_quota_gib, 0.0);
        assert_eq!(n.percent_used.to_string(), "0");

        let n = normalize(&raw(Some(0), Some(0), Some(GIB)), "fb1");
        assert_eq!(n.percent_used, PercentUsed::Unbounded);
    }

    #[test]
    fn test_half_used() {
        let n = normalize(&raw(None, Some(2 * GIB), Some(GIB)), "fb1");
        assert_eq!(n.percent_used.to_string(), "50.0");
    }

    #[test]
    fn test_zero_usage_is_a_valid_ratio() {
        let n = normalize(&raw(None, Some(GIB), Some(0)), "fb1");
        assert_eq!(n.usage_gib, 0.0);
        assert_eq!(n.percent_used.to_string(), "0.0");
    }

    #[test]
    fn test_percent_retried_against_default() {
        let n = normalize(&raw(Some(GIB), Some(0), Some(GIB / 2)), "fb1");
        assert_eq!(n.default_quota_gib, 1.0);
        assert_eq!(n.effective_quota_gib, 1.0);
        assert_eq!(n.usage_gib, 0.5);
        assert_eq!(n.percent_used.to_string(), "50.0");
    }

    #[test]
    fn test_percent_rounded_to_two_places() {
        let n = normalize(&raw(None, Some(3 * GIB), Some(GIB)), "fb1");
        assert_eq!(n.percent_used, PercentUsed::Ratio(33.33));
    }

    #[test]
    fn test_over_quota_exceeds_hundred() {
        let n = normalize(&raw(None, Some(GIB), Some(3 * GIB / 2)), "fb1");
        assert_eq!(n.percent_used, PercentUsed::Ratio(150.0));
    }

    #[test]
    fn test_identity_fields_pass_through() {
        let n = normalize(&raw(None, None, None), "fb-east");
        assert_eq!(n.array_name, "fb-east");
        assert_eq!(n.file_system_name, "fs1");
        assert_eq!(n.user_name, "alice");
        assert_eq!(n.user_id, 1001);
        assert_eq!(n.usage_gib, 0.0);
    }

    #[test]
    fn test_filter_none_passes_everything() {
        let recs = vec![named("a"), named("b"), named("a")];
        let out: Vec<_> = filter_user(recs.clone(), None).collect();
        assert_eq!(out, recs);
    }

    #[test]
    fn test_filter_keeps_matching_in_order() {
        let mut a1 = named("alice");
        a1.file_system_name = "fs1".into();
        let mut a2 = named("alice");
        a2.file_system_name = "fs2".into();
        let recs = vec![a1.clone(), named("bob"), a2.clone()];
        let out: Vec<_> = filter_user(recs, Some("alice")).collect();
        assert_eq!(out, vec![a1, a2]);
    }

    #[test]
    fn test_filter_is_case_sensitive() {
        let recs = vec![named("Alice"), named("alice")];
        let out: Vec<_> = filter_user(recs, Some("alice")).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].user_name, "alice");
    }
}
