//! Inspect the network as seen by the SDN controller.
use anyhow::Result;
use clap::Args;
use clap::Parser;
use clap::Subcommand;

use sdnac_controller_client::AttachmentPoint;
use sdnac_policy::MacAddress;

use crate::Globals;

/// Inspect the network as seen by the SDN controller.
#[derive(Debug, Parser)]
pub struct NetworkCli {
    /// Select the `sdnac network` command to run.
    #[command(subcommand)]
    pub command: NetworkCmd,
}

/// Select the `sdnac network` command to run.
#[derive(Debug, Subcommand)]
pub enum NetworkCmd {
    /// List devices known to the controller and where they are attached.
    Devices,

    /// Find the switch port a device is attached to.
    Locate(LocateOpt),

    /// Show the path the controller computes between two switch ports.
    Route(RouteOpt),

    /// List switches connected to the controller.
    Switches,
}

/// Arguments to locate a device on the network.
#[derive(Args, Debug)]
pub struct LocateOpt {
    /// Hardware address of the device to locate.
    pub mac: MacAddress,
}

/// Arguments to compute a route between two attachment points.
#[derive(Args, Debug)]
pub struct RouteOpt {
    /// DPID of the switch the route starts from.
    pub src_switch: String,

    /// Port on the source switch.
    pub src_port: u32,

    /// DPID of the switch the route ends at.
    pub dst_switch: String,

    /// Port on the destination switch.
    pub dst_port: u32,
}

/// Execute the selected `sdnac network` command.
pub async fn run(globals: &Globals, cmd: &NetworkCli) -> Result<i32> {
    match &cmd.command {
        NetworkCmd::Devices => devices(globals).await,
        NetworkCmd::Locate(opt) => locate(globals, opt).await,
        NetworkCmd::Route(opt) => route(globals, opt).await,
        NetworkCmd::Switches => switches(globals).await,
    }
}

async fn devices(globals: &Globals) -> Result<i32> {
    let client = globals.client()?;
    let devices = client.devices().await?;
    println!("{}", crate::formatter::devices(&devices));
    Ok(0)
}

async fn locate(globals: &Globals, opt: &LocateOpt) -> Result<i32> {
    let client = globals.client()?;
    match sdnac_connections::resolve_attachment(&client, &opt.mac).await? {
        Some(point) => {
            println!("Device {} is attached to {}", opt.mac, point);
            Ok(0)
        }
        None => {
            eprintln!("Device {} is not attached to the network", opt.mac);
            Ok(1)
        }
    }
}

async fn route(globals: &Globals, opt: &RouteOpt) -> Result<i32> {
    let client = globals.client()?;
    let src = AttachmentPoint::new(&opt.src_switch, opt.src_port);
    let dst = AttachmentPoint::new(&opt.dst_switch, opt.dst_port);
    let hops = client.route(&src, &dst).await?;
    if hops.is_empty() {
        eprintln!("The controller knows no route from {} to {}", src, dst);
        return Ok(1);
    }
    println!("{}", crate::formatter::route(&hops));
    Ok(0)
}

async fn switches(globals: &Globals) -> Result<i32> {
    let client = globals.client()?;
    let switches = client.switches().await?;
    println!("{}", crate::formatter::switches(&switches));
    Ok(0)
}
