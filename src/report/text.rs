//! Localized chart titles and labels

use crate::types::Locale;

/// Every user-facing string of the report
#[derive(Debug, Clone, Copy)]
pub struct Text {
    pub memory: &'static str,
    pub fraud_rate: &'static str,
    pub histogram_title: &'static str,
    pub histogram_x: &'static str,
    pub histogram_y: &'static str,
    pub legend_fraud: &'static str,
    pub legend_legit: &'static str,
    pub no_amounts: &'static str,
    pub correlation_title: &'static str,
    /// `{n}` is replaced with the list length
    pub top_ips_title: &'static str,
    pub top_devices_title: &'static str,
    pub fraud_count: &'static str,
    pub ip_address: &'static str,
    pub device: &'static str,
    pub hourly_title: &'static str,
    pub hour_axis: &'static str,
    pub weekday_title: &'static str,
    pub weekday_axis: &'static str,
    pub fraud_share: &'static str,
}

const EN: Text = Text {
    memory: "Memory",
    fraud_rate: "Fraud rate",
    histogram_title: "Transaction amount distribution in USD (log scale)",
    histogram_x: "USD",
    histogram_y: "Density",
    legend_fraud: "fraud",
    legend_legit: "legit",
    no_amounts: "no positive USD amounts in sample",
    correlation_title: "Feature correlation",
    top_ips_title: "Top {n} IP addresses by fraudulent transactions",
    top_devices_title: "Top {n} devices by fraudulent transactions",
    fraud_count: "Fraudulent transactions",
    ip_address: "IP address",
    device: "Device",
    hourly_title: "Fraud rate by hour of day",
    hour_axis: "Hour of day",
    weekday_title: "Fraud rate by day of week",
    weekday_axis: "Day of week",
    fraud_share: "Fraud share",
};

const RU: Text = Text {
    memory: "Память",
    fraud_rate: "Уровень мошенничества",
    histogram_title: "Распределение суммы транзакций в USD (лог-шкала)",
    histogram_x: "USD",
    histogram_y: "Плотность",
    legend_fraud: "фрод",
    legend_legit: "не фрод",
    no_amounts: "в выборке нет положительных сумм в USD",
    correlation_title: "Корреляция признаков",
    top_ips_title: "Топ {n} IP-адресов с наибольшим числом мошеннических транзакций",
    top_devices_title: "Топ {n} устройств с наибольшим числом мошеннических транзакций",
    fraud_count: "Количество фрод-транзакций",
    ip_address: "IP-адрес",
    device: "Устройство",
    hourly_title: "Доля мошенничества по часам дня",
    hour_axis: "Час дня",
    weekday_title: "Доля мошенничества по дням недели",
    weekday_axis: "День недели",
    fraud_share: "Доля фрод-транзакций",
};

impl Text {
    pub fn for_locale(locale: Locale) -> &'static Text {
        match locale {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }

    pub fn top_ips(&self, n: usize) -> String {
        self.top_ips_title.replace("{n}", &n.to_string())
    }

    pub fn top_devices(&self, n: usize) -> String {
        self.top_devices_title.replace("{n}", &n.to_string())
    }
}
