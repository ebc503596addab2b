use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// type of cycling guidance ("Art der Radverkehrsführung").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Fuehrung {
    #[serde(rename = "Radfahrstreifen")]
    Radfahrstreifen,
    #[serde(rename = "Radfahrstreifen mit Linienverkehr frei (Z237 + Z1026-32)")]
    RadfahrstreifenMitLinienverkehr,
    #[serde(rename = "Geschützter Radfahrstreifen")]
    GeschuetzterRadfahrstreifen,
    #[serde(rename = "Schutzstreifen")]
    Schutzstreifen,
    #[serde(rename = "Fahrradstraße /-zone (Z244)")]
    Fahrradstrasse,
    #[serde(rename = "Gemeinsamer Geh- und Radweg mit Z240")]
    GemeinsamerGehUndRadweg,
    #[serde(rename = "Radweg")]
    Radweg,
    #[serde(rename = "Bussonderfahrstreifen mit Radverkehr frei (Z245 mit Z1022-10)")]
    Bussonderfahrstreifen,
    #[serde(rename = "Gehweg mit Zusatzzeichen Radverkehr frei")]
    GehwegRadverkehrFrei,
    #[serde(rename = "Fußgängerzone Radverkehr frei")]
    FussgaengerzoneRadverkehrFrei,
    #[serde(rename = "Mischverkehr mit motorisiertem Verkehr")]
    Mischverkehr,
    #[serde(rename = "Sonstige Wege (Gehwege, Wege durch Grünflächen, Plätze)")]
    SonstigeWegeGruenflaechen,
    #[serde(rename = "Sonstige Wege")]
    SonstigeWege,
    #[serde(rename = "Keine Radinfrastruktur vorhanden")]
    KeineRadinfrastruktur,
    #[serde(rename = "[TODO] Gehweg ohne Verkehrszeichen")]
    TodoGehwegOhneVerkehrszeichen,
    #[serde(rename = "[TODO] Kreuzungs-Querung")]
    TodoKreuzungsQuerung,
    #[serde(rename = "[TODO] Klärung notwendig")]
    TodoKlaerungNotwendig,
    #[serde(rename = "[TODO] Führung fehlt")]
    TodoFuehrungFehlt,
}

impl Fuehrung {
    pub fn as_str(&self) -> &'static str {
        match self {
            Fuehrung::Radfahrstreifen => "Radfahrstreifen",
            Fuehrung::RadfahrstreifenMitLinienverkehr => {
                "Radfahrstreifen mit Linienverkehr frei (Z237 + Z1026-32)"
            }
            Fuehrung::GeschuetzterRadfahrstreifen => "Geschützter Radfahrstreifen",
            Fuehrung::Schutzstreifen => "Schutzstreifen",
            Fuehrung::Fahrradstrasse => "Fahrradstraße /-zone (Z244)",
            Fuehrung::GemeinsamerGehUndRadweg => "Gemeinsamer Geh- und Radweg mit Z240",
            Fuehrung::Radweg => "Radweg",
            Fuehrung::Bussonderfahrstreifen => {
                "Bussonderfahrstreifen mit Radverkehr frei (Z245 mit Z1022-10)"
            }
            Fuehrung::GehwegRadverkehrFrei => "Gehweg mit Zusatzzeichen Radverkehr frei",
            Fuehrung::FussgaengerzoneRadverkehrFrei => "Fußgängerzone Radverkehr frei",
            Fuehrung::Mischverkehr => "Mischverkehr mit motorisiertem Verkehr",
            Fuehrung::SonstigeWegeGruenflaechen => {
                "Sonstige Wege (Gehwege, Wege durch Grünflächen, Plätze)"
            }
            Fuehrung::SonstigeWege => "Sonstige Wege",
            Fuehrung::KeineRadinfrastruktur => "Keine Radinfrastruktur vorhanden",
            Fuehrung::TodoGehwegOhneVerkehrszeichen => "[TODO] Gehweg ohne Verkehrszeichen",
            Fuehrung::TodoKreuzungsQuerung => "[TODO] Kreuzungs-Querung",
            Fuehrung::TodoKlaerungNotwendig => "[TODO] Klärung notwendig",
            Fuehrung::TodoFuehrungFehlt => "[TODO] Führung fehlt",
        }
    }
}

impl Display for Fuehrung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// direction of cycling traffic on a way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verkehrsrichtung {
    #[serde(rename = "Einrichtungsverkehr")]
    Einrichtungsverkehr,
    #[serde(rename = "Zweirichtungsverkehr")]
    Zweirichtungsverkehr,
    #[serde(rename = "[TODO] vermutlich nein")]
    TodoVermutlichNein,
    #[serde(rename = "[TODO] vermutlich Einrichtungsverkehr")]
    TodoVermutlichEinrichtung,
    #[serde(rename = "[TODO] fehlender Wert")]
    TodoFehlenderWert,
}

impl Verkehrsrichtung {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verkehrsrichtung::Einrichtungsverkehr => "Einrichtungsverkehr",
            Verkehrsrichtung::Zweirichtungsverkehr => "Zweirichtungsverkehr",
            Verkehrsrichtung::TodoVermutlichNein => "[TODO] vermutlich nein",
            Verkehrsrichtung::TodoVermutlichEinrichtung => {
                "[TODO] vermutlich Einrichtungsverkehr"
            }
            Verkehrsrichtung::TodoFehlenderWert => "[TODO] fehlender Wert",
        }
    }
}

impl Display for Verkehrsrichtung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// surface material ("Oberflächenmaterial").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Oberflaeche {
    #[serde(rename = "Asphalt")]
    Asphalt,
    #[serde(rename = "Beton (Platte etc.)")]
    Beton,
    #[serde(rename = "Gepflastert (Berliner Platte, Mosaik, Kleinstein...)")]
    Gepflastert,
    #[serde(rename = "Kopfsteinpflaster / Großstein")]
    Kopfsteinpflaster,
    #[serde(rename = "Ungebunden")]
    Ungebunden,
    #[serde(rename = "[TODO] nicht zuordenbar")]
    TodoNichtZuordenbar,
    #[serde(rename = "[TODO] fehlt")]
    TodoFehlt,
    #[serde(rename = "NICHT-GEFUNDEN")]
    NichtGefunden,
}

impl Oberflaeche {
    pub fn as_str(&self) -> &'static str {
        match self {
            Oberflaeche::Asphalt => "Asphalt",
            Oberflaeche::Beton => "Beton (Platte etc.)",
            Oberflaeche::Gepflastert => "Gepflastert (Berliner Platte, Mosaik, Kleinstein...)",
            Oberflaeche::Kopfsteinpflaster => "Kopfsteinpflaster / Großstein",
            Oberflaeche::Ungebunden => "Ungebunden",
            Oberflaeche::TodoNichtZuordenbar => "[TODO] nicht zuordenbar",
            Oberflaeche::TodoFehlt => "[TODO] fehlt",
            Oberflaeche::NichtGefunden => "NICHT-GEFUNDEN",
        }
    }
}

impl Display for Oberflaeche {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// physical protection of a protected bike lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protektion {
    #[serde(rename = "Ohne")]
    Ohne,
    #[serde(rename = "Ruhender Verkehr (mit Sperrfläche)")]
    RuhenderVerkehr,
    #[serde(rename = "Poller (auf Sperrfläche)")]
    Poller,
    #[serde(rename = "Schwellen (auf Sperrfläche)")]
    Schwellen,
    #[serde(rename = "Leitboys (flexibel, auf Breitstrich, ohne Sperrfläche)")]
    Leitboys,
    #[serde(rename = "Sonstige (z.B. Pflanzkübel, Leitplanke)")]
    Sonstige,
    #[serde(rename = "nur Sperrfläche")]
    NurSperrflaeche,
    #[serde(rename = "[TODO] Protektionstyp fehlt")]
    TodoProtektionstypFehlt,
}

impl Protektion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protektion::Ohne => "Ohne",
            Protektion::RuhenderVerkehr => "Ruhender Verkehr (mit Sperrfläche)",
            Protektion::Poller => "Poller (auf Sperrfläche)",
            Protektion::Schwellen => "Schwellen (auf Sperrfläche)",
            Protektion::Leitboys => "Leitboys (flexibel, auf Breitstrich, ohne Sperrfläche)",
            Protektion::Sonstige => "Sonstige (z.B. Pflanzkübel, Leitplanke)",
            Protektion::NurSperrflaeche => "nur Sperrfläche",
            Protektion::TodoProtektionstypFehlt => "[TODO] Protektionstyp fehlt",
        }
    }
}

impl Display for Protektion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// presence of a safety separation strip towards parked traffic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trennstreifen {
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "nein")]
    Nein,
    #[serde(rename = "entfällt")]
    Entfaellt,
}

impl Trennstreifen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trennstreifen::Ja => "ja",
            Trennstreifen::Nein => "nein",
            Trennstreifen::Entfaellt => "entfällt",
        }
    }

    /// rank in the worst-wins ordering, lower is worse: nein > ja > entfällt.
    pub fn worst_rank(&self) -> u8 {
        match self {
            Trennstreifen::Nein => 0,
            Trennstreifen::Ja => 1,
            Trennstreifen::Entfaellt => 2,
        }
    }
}

impl Display for Trennstreifen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// usage restriction due to structural defects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NutzungsBeschraenkung {
    #[serde(rename = "Physische Sperre")]
    PhysischeSperre,
    #[serde(
        rename = "Schadensschild/StVO Zusatzeichen (Straßenschäden, Gehwegschäden, Radwegschäden)"
    )]
    Schadensschild,
    #[serde(rename = "keine")]
    Keine,
}

impl NutzungsBeschraenkung {
    pub fn as_str(&self) -> &'static str {
        match self {
            NutzungsBeschraenkung::PhysischeSperre => "Physische Sperre",
            NutzungsBeschraenkung::Schadensschild => {
                "Schadensschild/StVO Zusatzeichen (Straßenschäden, Gehwegschäden, Radwegschäden)"
            }
            NutzungsBeschraenkung::Keine => "keine",
        }
    }

    /// rank in the worst-wins ordering, lower is worse:
    /// Physische Sperre > Schadensschild > keine.
    pub fn worst_rank(&self) -> u8 {
        match self {
            NutzungsBeschraenkung::PhysischeSperre => 0,
            NutzungsBeschraenkung::Schadensschild => 1,
            NutzungsBeschraenkung::Keine => 2,
        }
    }
}

impl Display for NutzungsBeschraenkung {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// the normalized attribute set carried by every attributed segment and
/// edge. `fuehr` is always present; the remaining fields stay empty on the
/// "no infrastructure" placeholder variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAttributes {
    pub fuehr: Fuehrung,
    pub verkehrsri: Option<Verkehrsrichtung>,
    pub ofm: Option<Oberflaeche>,
    pub protek: Option<Protektion>,
    pub trennstreifen: Option<Trennstreifen>,
    pub nutz_beschr: Option<NutzungsBeschraenkung>,
    pub pflicht: Option<bool>,
    pub farbe: Option<bool>,
    pub breite: Option<f64>,
}

impl NormalizedAttributes {
    /// placeholder attribute set for network coverage without any matched
    /// cycling infrastructure.
    pub fn no_infrastructure() -> NormalizedAttributes {
        NormalizedAttributes {
            fuehr: Fuehrung::KeineRadinfrastruktur,
            verkehrsri: None,
            ofm: None,
            protek: None,
            trennstreifen: None,
            nutz_beschr: None,
            pflicht: None,
            farbe: None,
            breite: None,
        }
    }

    /// stable grouping key over the normalized attribute values: missing
    /// values become "NULL", floats are rounded to one decimal, booleans
    /// stringified, everything else trimmed display text.
    pub fn grouping_key(&self) -> String {
        fn norm<T: Display>(value: &Option<T>) -> String {
            match value {
                Some(v) => v.to_string().trim().to_string(),
                None => String::from("NULL"),
            }
        }
        let breite = match self.breite {
            Some(b) => format!("{:.1}", b),
            None => String::from("NULL"),
        };
        [
            self.fuehr.to_string(),
            norm(&self.verkehrsri),
            norm(&self.ofm),
            norm(&self.protek),
            norm(&self.trennstreifen),
            norm(&self.nutz_beschr),
            norm(&self.pflicht),
            norm(&self.farbe),
            breite,
        ]
        .join("|")
    }
}
