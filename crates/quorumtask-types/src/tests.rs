// Cross-module tests for the types crate

#[cfg(test)]
mod tests {
    use crate::*;
    use proptest::prelude::*;

    fn node(id: &str) -> NodeId {
        NodeId::new(id)
    }

    #[test]
    fn test_positive_vote_without_trigger_is_dropped() {
        let mut triggers = AuditTriggers::new();
        let written = triggers.record_vote(&node("B"), AuditVote::new(true, node("A"), 10));

        assert!(!written);
        assert!(triggers.is_empty());
    }

    #[test]
    fn test_negative_vote_opens_trigger() {
        let mut triggers = AuditTriggers::new();
        assert!(triggers.record_vote(&node("B"), AuditVote::new(false, node("A"), 10)));

        let trigger = triggers.get(&node("B")).unwrap();
        assert_eq!(trigger.triggered_by, node("A"));
        assert_eq!(trigger.slot, 10);
        assert_eq!(trigger.votes.len(), 1);
        assert_eq!(trigger.negative_votes(), 1);
    }

    #[test]
    fn test_votes_append_once_open() {
        let mut triggers = AuditTriggers::new();
        triggers.record_vote(&node("B"), AuditVote::new(false, node("A"), 10));
        assert!(triggers.record_vote(&node("B"), AuditVote::new(true, node("C"), 11)));
        assert!(triggers.record_vote(&node("B"), AuditVote::new(true, node("D"), 12)));

        let trigger = triggers.get(&node("B")).unwrap();
        assert_eq!(trigger.votes.len(), 3);
        assert_eq!(trigger.triggered_by, node("A"));
        assert!(!trigger.is_rejected());
        assert_eq!(triggers.rejected().count(), 0);
    }

    #[test]
    fn test_audit_record_never_reverts() {
        let mut record = AuditRecord::default();
        assert_eq!(record, AuditRecord::Uninitialized);

        assert!(record.finalize(AuditRecord::PayoutFailed));
        assert!(!record.finalize(AuditRecord::PayoutSuccessful));
        assert!(!record.finalize(AuditRecord::Uninitialized));
        assert_eq!(record, AuditRecord::PayoutFailed);
    }

    #[test]
    fn test_submission_json_shape() {
        let sub = Submission::new("cid123", 42);
        let json = serde_json::to_string(&sub).unwrap();
        assert_eq!(json, r#"{"value":"cid123","slot":42}"#);

        let with_round: Submission =
            serde_json::from_str(r#"{"value":"v","slot":1,"round":3}"#).unwrap();
        assert_eq!(with_round.round, Some(3));
    }

    #[test]
    fn test_distribution_state_defaults() {
        let info = TaskDistributionInfo::default();
        assert_eq!(info.record_for(9), AuditRecord::Uninitialized);
        assert!(info.triggers_for(9).is_empty());
        assert!(info.submissions_for(9).is_none());
    }

    #[test]
    fn test_distribution_list_json() {
        let mut list = DistributionList::new(4);
        list.rewards.insert(node("A"), 50);
        list.rewards.insert(node("B"), 50);
        list.slashed.insert(node("C"), 10);

        let json = list.to_canonical_json().unwrap();
        assert_eq!(DistributionList::from_json(&json).unwrap(), list);
        assert_eq!(list.total_rewards(), 100);
    }

    #[test]
    fn test_payout_delay() {
        let timing = RoundTiming::new(30, 20);
        assert_eq!(timing.payout_delay_ms(400), 20_000);
        assert_eq!(RoundTiming::new(u64::MAX, 1).payout_delay_ms(2), u64::MAX);
    }

    #[test]
    fn test_mode_self_votes() {
        assert!(!OperatingMode::default().allows_self_votes());
        assert!(OperatingMode::Standalone.allows_self_votes());
    }

    proptest! {
        #[test]
        fn prop_trigger_only_grows(votes in proptest::collection::vec(any::<bool>(), 0..20)) {
            let mut triggers = AuditTriggers::new();
            let candidate = node("X");
            let mut previous = 0usize;
            for (i, is_valid) in votes.iter().enumerate() {
                triggers.record_vote(&candidate, AuditVote::new(*is_valid, node(&format!("v{}", i)), i as u64));
                let now = triggers.get(&candidate).map(|t| t.votes.len()).unwrap_or(0);
                prop_assert!(now >= previous);
                previous = now;
            }
            let first_negative = votes.iter().position(|v| !*v);
            let expected = first_negative.map(|p| votes.len() - p).unwrap_or(0);
            prop_assert_eq!(previous, expected);
        }
    }
}
