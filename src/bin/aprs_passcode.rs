use clap::Parser;

use tracker2aprs::aprs::parse::is_callsign;
use tracker2aprs::aprs::passcode;

#[derive(Parser, Debug)]
#[command(name = "aprs_passcode")]
#[command(about = "Print the APRS-IS passcode for a callsign")]
struct Args {
    /// Callsign, SSID optional (e.g. "OZ3RF-9")
    callsign: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if !is_callsign(&args.callsign) {
        anyhow::bail!("Not a valid callsign: {}", args.callsign);
    }

    println!("{}", passcode(&args.callsign));
    Ok(())
}
