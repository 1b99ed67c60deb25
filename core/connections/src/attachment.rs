//! Locate student devices on the network.
use anyhow::Result;

use sdnac_controller_client::AttachmentPoint;
use sdnac_controller_client::Client;
use sdnac_policy::MacAddress;

/// Find the switch port a device is attached to, based on the controller's device inventory.
///
/// Only the first hardware address reported for each device is compared, and only the
/// first attachment point of the matching device is returned.
/// `None` is returned when no device matches or the matching device is not attached.
pub async fn resolve_attachment(
    client: &Client,
    mac: &MacAddress,
) -> Result<Option<AttachmentPoint>> {
    let devices = client.devices().await?;
    let device = devices.into_iter().find(|device| {
        device
            .mac
            .first()
            .and_then(|reported| reported.parse::<MacAddress>().ok())
            .map(|reported| &reported == mac)
            .unwrap_or(false)
    });
    Ok(device.and_then(|device| device.attachment_points.into_iter().next()))
}

#[cfg(test)]
mod tests {
    use sdnac_controller_client::fixture::Controller;
    use sdnac_controller_client::AttachmentPoint;
    use sdnac_controller_client::Client;
    use sdnac_controller_client::ControllerUnreachable;
    use sdnac_policy::MacAddress;

    use super::resolve_attachment;

    fn mac(value: &str) -> MacAddress {
        value.parse().unwrap()
    }

    #[tokio::test]
    async fn address_forms_resolve_alike() {
        let fixture = Controller::default();
        fixture
            .device("11:22:33:44:55:66", "s2", 9)
            .device("00:1a:2b:3c:4d:5e", "s1", 4);
        let client = Client::from(fixture);
        let expected = Some(AttachmentPoint::new("s1", 4));
        for value in ["00:1A:2B:3C:4D:5E", "00-1a-2b-3c-4d-5e", "001A2B3C4D5E"] {
            let point = resolve_attachment(&client, &mac(value)).await.unwrap();
            assert_eq!(point, expected, "failed to resolve '{}'", value);
        }
    }

    #[tokio::test]
    async fn unknown_device() {
        let fixture = Controller::default();
        fixture.device("11:22:33:44:55:66", "s2", 9);
        let client = Client::from(fixture);
        let point = resolve_attachment(&client, &mac("AA:BB:CC:DD:EE:FF"))
            .await
            .unwrap();
        assert_eq!(point, None);
    }

    #[tokio::test]
    async fn detached_device() {
        let fixture = Controller::default();
        fixture.device_detached("aa:bb:cc:dd:ee:ff");
        let client = Client::from(fixture);
        let point = resolve_attachment(&client, &mac("AA:BB:CC:DD:EE:FF"))
            .await
            .unwrap();
        assert_eq!(point, None);
    }

    #[tokio::test]
    async fn unparsable_addresses_are_skipped() {
        let fixture = Controller::default();
        fixture
            .device("not-a-mac", "s9", 1)
            .device("aa:bb:cc:dd:ee:ff", "s1", 2);
        let client = Client::from(fixture);
        let point = resolve_attachment(&client, &mac("AA:BB:CC:DD:EE:FF"))
            .await
            .unwrap();
        assert_eq!(point, Some(AttachmentPoint::new("s1", 2)));
    }

    #[tokio::test]
    async fn controller_failures_propagate() {
        let fixture = Controller::default();
        fixture.unreachable();
        let client = Client::from(fixture);
        let error = resolve_attachment(&client, &mac("AA:BB:CC:DD:EE:FF"))
            .await
            .unwrap_err();
        assert!(error.downcast_ref::<ControllerUnreachable>().is_some());
    }
}
