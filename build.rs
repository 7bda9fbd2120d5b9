fn main() {
    println!("cargo:rerun-if-env-changed=LIFTSWITCH_WIFI_SSID");
    println!("cargo:rerun-if-env-changed=LIFTSWITCH_WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=LIFTSWITCH_SERVER_URL");
    println!("cargo:rerun-if-env-changed=LIFTSWITCH_DEVICE_ID");
    println!("cargo:rerun-if-env-changed=LIFTSWITCH_DEVICE_KEY");
    println!("cargo:rerun-if-env-changed=LIFTSWITCH_TLS_INSECURE");

    // Only firmware builds need the ESP-IDF sysenv; host test builds skip it.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
