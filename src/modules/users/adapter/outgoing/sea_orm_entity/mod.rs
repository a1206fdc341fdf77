pub mod credentials;
pub mod emergency_contacts;
pub mod personal_infos;
pub mod users;

use crate::users::application::domain::entities::SocialMedia;

/// Social-media handles persist as a flat JSON object of string pairs.
pub fn social_media_to_json(map: &SocialMedia) -> serde_json::Value {
    serde_json::Value::Object(
        map.iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect(),
    )
}

/// Non-string values are dropped rather than failing the whole read.
pub fn json_to_social_media(json: &serde_json::Value) -> Option<SocialMedia> {
    json.as_object().map(|obj| {
        obj.iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_social_media_round_trips_through_json() {
        let mut map = SocialMedia::new();
        map.insert("telegram".to_string(), "@sokdara".to_string());
        map.insert("facebook".to_string(), "sok.dara".to_string());

        let json = social_media_to_json(&map);
        assert_eq!(json_to_social_media(&json), Some(map));
    }

    #[test]
    fn test_non_string_values_are_dropped() {
        let json = serde_json::json!({"telegram": "@sokdara", "followers": 42});
        let map = json_to_social_media(&json).unwrap();

        assert_eq!(map.len(), 1);
        assert_eq!(map.get("telegram").map(String::as_str), Some("@sokdara"));
    }

    #[test]
    fn test_non_object_json_is_none() {
        assert_eq!(json_to_social_media(&serde_json::json!("telegram")), None);
    }
}
