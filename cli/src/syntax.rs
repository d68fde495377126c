//! Query syntax cheat sheets shown by `-k`.

use assetq_core::Provider;

const FOFA: &str = r#"
FOFA syntax

Basic:
  ip="1.1.1.1"              IPv4 address
  ip="1.1.1.1/24"           IPv4 C-class range
  port="6379"               port
  domain="qq.com"           root domain
  host=".fofa.info"         host name
  os="centos"               operating system
  server="Microsoft-IIS/10" web server
  asn="19551"               autonomous system number
  org="LLC Baxet"           organisation

Tags:
  app="Microsoft-Exchange"  FOFA rule
  product="NGINX"           product name
  type="service"            protocol assets only
  type="subdomain"          website assets only
  is_cloud=true             cloud assets

Websites:
  title="beijing"           page title
  header="elastic"          response header
  body="keyword"            page body
  status_code="200"         HTTP status
  icp="ICP-030173"          ICP licence

Location:
  country="CN"  region="Zhejiang"  city="Hangzhou"

Certificates:
  cert="baidu"  cert.subject="Oracle"  cert.issuer="DigiCert"  cert.is_valid=true

Time:
  after="20230101"  before="20231201"    (YYYYMMDD)

Operators:
  &&  ||  =  !=  *=

Example:
  country="CN" && server="Apache"
"#;

const HUNTER: &str = r#"
Hunter syntax

Basic:
  ip="1.1.1.1"              IPv4 address
  ip="1.1.1.1/24"           C-class range
  ip.port="80"              port
  ip.port_count>"2"         number of open ports
  ip.country="CN"  ip.province="Beijing"  ip.city="Beijing"
  ip.isp="telecom"          carrier
  ip.os="Windows"           operating system
  ip.tag="CDN"              IP tag

Domains:
  domain.suffix="qianxin.com"   sites under a root domain
  domain.cname="xxx.com"        CNAME record

Websites:
  is_web=true               web assets only
  web.title="Beijing"       page title
  web.body="keyword"        page body
  web.icon="22eeab7..."     same icon hash
  header.server="nginx"     server header
  header.status_code="200"  HTTP status
  web.is_vul=true           assets with known vulnerabilities

Certificates:
  cert.issuer="DigiCert"  cert.is_trust=true  cert.is_expired=true

ICP:
  icp.number="..."  icp.name="..."  icp.web_name="..."

Time:
  after="2021-01-01"  before="2021-12-31"    (YYYY-MM-DD)
  -m N limits results to the last N months

Operators:
  &&  ||  =  !=  >  <

Example:
  ip.country="CN" && ip.tag="CDN"
"#;

const QUAKE: &str = r#"
Quake syntax

Basic:
  ip:"8.8.8.8"              IPv4 or IPv6 address
  ip:52.2.254.36/24         CIDR range
  host:"google.com"         domain
  hostname:google.com       host name
  port:80                   port
  ports:80,8080,9999        several ports
  service:"ssh"             service protocol
  os:"RouterOS"             operating system
  app:"Apache"              product

Websites:
  title:"Cisco"  body:"keyword"  headers:"ThinkPHP"  ssl:"google"
  response:"220 ProFTPD"    raw port response

Location:
  country:"CN"  province:"beijing"  city:"changsha"
  country_cn, province_cn, city_cn take Chinese names

Organisation:
  org:"..."  asn:"12345"  isp:"China Mobile"

Operators:
  and  or  not  ()
  Use `or` rather than `|` or `||`.

Time:
  -m 0  last 12 months (default)
  -m N  last N months

Example:
  country:"CN" and app:"Apache"
"#;

/// Syntax reference for a provider.
#[must_use]
pub fn reference(provider: Provider) -> &'static str {
    match provider {
        Provider::Fofa => FOFA,
        Provider::Hunter => HUNTER,
        Provider::Quake => QUAKE,
    }
}
