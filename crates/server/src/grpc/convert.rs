use tonic::Status;
use uuid::Uuid;

use proto::catalog::v1::ServiceObject;
use service::catalog::domain::Service;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

pub fn service_object(s: &Service) -> ServiceObject {
    ServiceObject {
        id: s.id.to_string(),
        title: s.title.clone(),
        photo: s.photo.clone(),
        created_time: s.created_time.format(TIME_FORMAT).to_string(),
        updated_time: s.updated_time.format(TIME_FORMAT).to_string(),
    }
}

pub fn service_objects(services: &[Service]) -> Vec<ServiceObject> {
    services.iter().map(service_object).collect()
}

pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, Status> {
    Uuid::parse_str(raw.trim()).map_err(|_| Status::invalid_argument(format!("{field} is not a valid uuid: {raw:?}")))
}

pub fn parse_uuids(field: &str, raw: &[String]) -> Result<Vec<Uuid>, Status> {
    raw.iter().map(|r| parse_uuid(field, r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    #[test]
    fn renders_timestamps_with_offset() {
        let ts = FixedOffset::east_opt(3 * 3600).unwrap().with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap();
        let s = Service { id: Uuid::nil(), title: "gym".into(), photo: String::new(), created_time: ts, updated_time: ts };
        let obj = service_object(&s);
        assert_eq!(obj.id, "00000000-0000-0000-0000-000000000000");
        assert_eq!(obj.created_time, "2024-05-01 10:30:00 +0300");
    }

    #[test]
    fn malformed_ids_are_invalid_argument() {
        assert_eq!(parse_uuid("id", "nope").unwrap_err().code(), tonic::Code::InvalidArgument);
        let ids = parse_uuids("service_id", &[Uuid::nil().to_string()]).unwrap();
        assert_eq!(ids, vec![Uuid::nil()]);
        assert!(parse_uuids("service_id", &["1".into()]).is_err());
    }
}
