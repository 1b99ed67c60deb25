//! In-memory controller implementation for unit tests.
//!
//! The fixture is cheap to clone and all clones share state, so tests can keep a handle
//! to inspect pushed and deleted flows after moving a clone into a [`Client`](crate::Client).
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::Result;

use crate::AttachmentPoint;
use crate::ControllerRejected;
use crate::ControllerUnreachable;
use crate::Device;
use crate::FlowDescriptor;
use crate::RouteHop;
use crate::Switch;

/// Class of failure the fixture should simulate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Failure {
    Rejected,
    Unreachable,
}

impl Failure {
    fn raise(self, operation: &str) -> anyhow::Error {
        match self {
            Failure::Rejected => {
                anyhow::anyhow!(ControllerRejected::new(operation, "simulated rejection"))
            }
            Failure::Unreachable => anyhow::anyhow!(ControllerUnreachable::new(operation)),
        }
    }
}

/// In-memory controller implementation for unit tests.
#[derive(Clone, Default)]
pub struct Controller {
    state: Arc<Mutex<ControllerState>>,
}

impl Controller {
    /// Add a device attached to the network at the given switch port.
    pub fn device<S1, S2>(&self, mac: S1, switch: S2, port: u32) -> &Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let device = Device {
            attachment_points: vec![AttachmentPoint::new(switch, port)],
            ipv4: Vec::new(),
            mac: vec![mac.into()],
        };
        self.state.lock().unwrap().devices.push(device);
        self
    }

    /// Add a device the controller knows about but has no attachment point for.
    pub fn device_detached<S: Into<String>>(&self, mac: S) -> &Self {
        let device = Device {
            attachment_points: Vec::new(),
            ipv4: Vec::new(),
            mac: vec![mac.into()],
        };
        self.state.lock().unwrap().devices.push(device);
        self
    }

    /// Fail all flow deletions from the given (zero-based) call onwards.
    pub fn fail_deletes_from(&self, call: usize, failure: Failure) -> &Self {
        self.state.lock().unwrap().fail_delete = Some((call, failure));
        self
    }

    /// Fail all flow pushes from the given (zero-based) call onwards.
    pub fn fail_pushes_from(&self, call: usize, failure: Failure) -> &Self {
        self.state.lock().unwrap().fail_push = Some((call, failure));
        self
    }

    /// Remove all devices with the given MAC address from the inventory.
    pub fn forget_device(&self, mac: &str) -> &Self {
        let mut state = self.state.lock().unwrap();
        state
            .devices
            .retain(|device| !device.mac.iter().any(|known| known == mac));
        self
    }

    /// Stop simulating failures for all operations.
    pub fn heal(&self) -> &Self {
        let mut state = self.state.lock().unwrap();
        state.fail_delete = None;
        state.fail_push = None;
        state.unreachable = false;
        self
    }

    /// Move every device with the given MAC address to a new attachment point.
    pub fn move_device<S: Into<String>>(&self, mac: &str, switch: S, port: u32) -> &Self {
        let point = AttachmentPoint::new(switch, port);
        let mut state = self.state.lock().unwrap();
        for device in state.devices.iter_mut() {
            if device.mac.iter().any(|known| known == mac) {
                device.attachment_points = vec![point.clone()];
            }
        }
        self
    }

    /// Set the route returned between two switches.
    pub fn route<S1, S2>(&self, src: S1, dst: S2, hops: Vec<RouteHop>) -> &Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        let key = (src.into(), dst.into());
        self.state.lock().unwrap().routes.insert(key, hops);
        self
    }

    /// Add a switch to the controller.
    pub fn switch<S: Into<String>>(&self, dpid: S) -> &Self {
        let switch = Switch {
            dpid: dpid.into(),
            inet_address: None,
        };
        self.state.lock().unwrap().switches.push(switch);
        self
    }

    /// Fail every operation as if the controller was down.
    pub fn unreachable(&self) -> &Self {
        self.state.lock().unwrap().unreachable = true;
        self
    }
}

impl Controller {
    /// Flows deleted so far as `(switch, name)` pairs, in request order.
    pub fn deleted(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().deleted.clone()
    }

    /// Number of delete requests received, including failed ones.
    pub fn delete_attempts(&self) -> usize {
        self.state.lock().unwrap().delete_attempts
    }

    /// Flows currently installed, keyed by `(switch, name)`.
    pub fn installed(&self) -> BTreeMap<(String, String), FlowDescriptor> {
        self.state.lock().unwrap().installed.clone()
    }

    /// Flows pushed so far, in request order.
    pub fn pushed(&self) -> Vec<FlowDescriptor> {
        self.state.lock().unwrap().pushed.clone()
    }

    /// Number of push requests received, including failed ones.
    pub fn push_attempts(&self) -> usize {
        self.state.lock().unwrap().push_attempts
    }
}

#[async_trait::async_trait]
impl super::IController for Controller {
    async fn delete_flow(&self, switch: &str, name: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let call = state.delete_attempts;
        state.delete_attempts += 1;
        state.check("delete static flow", call, state.fail_delete)?;
        let key = (switch.to_string(), name.to_string());
        state.installed.remove(&key);
        state.deleted.push(key);
        Ok(())
    }

    async fn devices(&self) -> Result<Vec<Device>> {
        let state = self.state.lock().unwrap();
        state.check("list devices", 0, None)?;
        Ok(state.devices.clone())
    }

    async fn push_flow(&self, flow: &FlowDescriptor) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let call = state.push_attempts;
        state.push_attempts += 1;
        state.check("push static flow", call, state.fail_push)?;
        let key = (flow.switch.clone(), flow.name.clone());
        state.installed.insert(key, flow.clone());
        state.pushed.push(flow.clone());
        Ok(())
    }

    async fn route(
        &self,
        src: &AttachmentPoint,
        dst: &AttachmentPoint,
    ) -> Result<Vec<RouteHop>> {
        let state = self.state.lock().unwrap();
        state.check("compute route", 0, None)?;
        let key = (src.switch.clone(), dst.switch.clone());
        Ok(state.routes.get(&key).cloned().unwrap_or_default())
    }

    async fn switches(&self) -> Result<Vec<Switch>> {
        let state = self.state.lock().unwrap();
        state.check("list switches", 0, None)?;
        Ok(state.switches.clone())
    }
}

/// Internal state to implement controller mocking.
#[derive(Default)]
struct ControllerState {
    delete_attempts: usize,
    deleted: Vec<(String, String)>,
    devices: Vec<Device>,
    fail_delete: Option<(usize, Failure)>,
    fail_push: Option<(usize, Failure)>,
    installed: BTreeMap<(String, String), FlowDescriptor>,
    push_attempts: usize,
    pushed: Vec<FlowDescriptor>,
    routes: HashMap<(String, String), Vec<RouteHop>>,
    switches: Vec<Switch>,
    unreachable: bool,
}

impl ControllerState {
    fn check(&self, operation: &str, call: usize, fail: Option<(usize, Failure)>) -> Result<()> {
        if self.unreachable {
            return Err(Failure::Unreachable.raise(operation));
        }
        match fail {
            Some((from, failure)) if call >= from => Err(failure.raise(operation)),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Controller;
    use super::Failure;
    use crate::AttachmentPoint;
    use crate::Client;
    use crate::ControllerRejected;
    use crate::ControllerUnreachable;
    use crate::FlowAction;
    use crate::FlowDescriptor;

    fn flow(name: &str) -> FlowDescriptor {
        FlowDescriptor {
            actions: FlowAction::Flood,
            active: true,
            cookie: 0,
            matches: Default::default(),
            name: name.into(),
            priority: 32768,
            switch: "s1".into(),
        }
    }

    #[tokio::test]
    async fn records_pushes_and_deletes() {
        let fixture = Controller::default();
        let client = Client::from(fixture.clone());
        client.push_flow(&flow("a")).await.unwrap();
        client.push_flow(&flow("b")).await.unwrap();
        client.delete_flow("s1", "a").await.unwrap();

        assert_eq!(fixture.pushed().len(), 2);
        assert_eq!(fixture.deleted(), vec![("s1".to_string(), "a".to_string())]);
        let installed: Vec<_> = fixture.installed().into_keys().collect();
        assert_eq!(installed, vec![("s1".to_string(), "b".to_string())]);
    }

    #[tokio::test]
    async fn fails_pushes_from_call() {
        let fixture = Controller::default();
        fixture.fail_pushes_from(1, Failure::Rejected);
        let client = Client::from(fixture.clone());
        client.push_flow(&flow("a")).await.unwrap();
        let error = client.push_flow(&flow("b")).await.unwrap_err();
        assert!(error.downcast_ref::<ControllerRejected>().is_some());
        assert_eq!(fixture.push_attempts(), 2);
        assert_eq!(fixture.pushed().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_fails_everything() {
        let fixture = Controller::default();
        fixture.device("aa:bb:cc:dd:ee:ff", "s1", 1).unreachable();
        let client = Client::from(fixture.clone());
        let error = client.devices().await.unwrap_err();
        assert!(error.downcast_ref::<ControllerUnreachable>().is_some());

        fixture.heal();
        assert_eq!(client.devices().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn routes_default_to_empty() {
        let fixture = Controller::default();
        let client = Client::from(fixture);
        let src = AttachmentPoint::new("s1", 1);
        let dst = AttachmentPoint::new("s2", 1);
        assert!(client.route(&src, &dst).await.unwrap().is_empty());
    }
}
