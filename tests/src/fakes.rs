use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use airlink_common::error::{Result, WifiError};
use airlink_common::network::lease::Lease;
use airlink_core::connect::Supplicant;
use airlink_core::dhcp::DhcpClient;
use airlink_core::dispatch::LinkProvider;
use airlink_core::tools::ToolRunner;

/// Answers each tool with fixed output and remembers every command line.
#[derive(Default)]
pub struct ScriptedTools {
    outputs: HashMap<String, String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedTools {
    pub fn with(mut self, tool: &str, output: &str) -> Self {
        self.outputs.insert(tool.to_string(), output.to_string());
        self
    }

    pub fn calls_to(&self, tool: &str) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.split(' ').next() == Some(tool))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl ToolRunner for ScriptedTools {
    async fn run(&self, tool: &str, args: &[&str]) -> Result<String> {
        let mut line = vec![tool];
        line.extend_from_slice(args);
        self.calls.lock().unwrap().push(line.join(" "));
        Ok(self.outputs.get(tool).cloned().unwrap_or_default())
    }
}

/// Keeps a copy of every profile it is started with.
#[derive(Default)]
pub struct RecordingSupplicant {
    pub profiles: Mutex<Vec<String>>,
}

#[async_trait]
impl Supplicant for RecordingSupplicant {
    async fn run(&self, _interface: &str, profile_path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(profile_path).unwrap();
        self.profiles.lock().unwrap().push(text);
        Ok(())
    }
}

/// Hands out `leases` in order, one per exchange, then never answers again.
pub struct QueuedDhcp {
    leases: Mutex<VecDeque<Lease>>,
    pub exchanges: Mutex<usize>,
}

impl QueuedDhcp {
    pub fn new(leases: Vec<Lease>) -> Self {
        Self {
            leases: Mutex::new(leases.into()),
            exchanges: Mutex::new(0),
        }
    }

    async fn next(&self) -> Result<Lease> {
        *self.exchanges.lock().unwrap() += 1;
        let next = self.leases.lock().unwrap().pop_front();
        match next {
            Some(lease) => Ok(lease),
            None => std::future::pending().await,
        }
    }
}

#[async_trait]
impl DhcpClient for QueuedDhcp {
    async fn solicit(&self, _interface: &str) -> Result<Lease> {
        self.next().await
    }

    async fn renew(&self, _interface: &str, _lease: &Lease) -> Result<Lease> {
        self.next().await
    }

    async fn handle_lease(&self, _interface: &str, _lease: &Lease) -> Result<()> {
        Ok(())
    }
}

/// A fixed set of interface names, some of which cannot be brought up.
pub struct StaticLinks {
    names: Vec<String>,
    broken: Vec<String>,
}

impl StaticLinks {
    pub fn new(names: &[&str], broken: &[&str]) -> Self {
        Self {
            names: names.iter().map(|n| n.to_string()).collect(),
            broken: broken.iter().map(|n| n.to_string()).collect(),
        }
    }
}

#[async_trait]
impl LinkProvider for StaticLinks {
    fn interfaces(&self) -> Result<Vec<String>> {
        Ok(self.names.clone())
    }

    async fn bring_up(&self, interface: &str) -> Result<()> {
        if self.broken.iter().any(|name| name == interface) {
            return Err(WifiError::ToolInvocation {
                tool: "ip".to_string(),
                output: "RTNETLINK answers: Operation not possible due to RF-kill".to_string(),
                reason: "exit status: 2".to_string(),
            });
        }
        Ok(())
    }
}
