#[cfg(test)]
mod tests {
    use super::super::{ChangeNotifier, EventType};
    use anyhow::Result;

    // Test that publishing with no subscribers is not an error
    #[tokio::test]
    async fn test_publish_without_subscribers() -> Result<()> {
        let notifier = ChangeNotifier::new(16);
        notifier.publish(
            EventType::RoomAdded,
            Some("1".to_string()),
            serde_json::json!({"name": "Room 101"}),
        )?;
        Ok(())
    }

    // Test that a subscriber receives published events in order
    #[tokio::test]
    async fn test_publish_subscribe() -> Result<()> {
        let notifier = ChangeNotifier::new(16);
        let mut receiver = notifier.subscribe();

        notifier.publish(
            EventType::SuspiciousBehaviorLogged,
            Some("student-001".to_string()),
            serde_json::json!({"description": "test"}),
        )?;
        notifier.publish(EventType::BehaviorRecorded, Some("student-001".to_string()), serde_json::Value::Null)?;

        let first = receiver.recv().await?;
        assert_eq!(first.event_type, EventType::SuspiciousBehaviorLogged);
        assert_eq!(first.routing_key(), "behavior.suspicious_logged.student-001");

        let second = receiver.recv().await?;
        assert_eq!(second.event_type, EventType::BehaviorRecorded);

        Ok(())
    }
}
